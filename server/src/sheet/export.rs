//! Tabular export pipeline: normalize heterogeneous rows into a rectangular
//! grid, chunk it, and write sequentially with fixed pacing.

use std::time::Duration;

use serde_json::Value;

use super::service::SheetService;
use super::types::{Grid, Row, SheetError};
use crate::deck::AssetService;
use crate::error::advisory;

/// Maximum rows per write call.
pub const CHUNK_ROWS: usize = 1000;

/// Fixed delay between consecutive chunk writes. Exists to stay under the
/// backend's rate limits; not adaptive.
pub const PACING_DELAY: Duration = Duration::from_millis(100);

/// Outcome of an export to an existing sheet.
#[derive(Debug, PartialEq, Eq)]
pub struct ExportSummary {
    pub rows: usize,
    pub columns: usize,
    pub batches: usize,
}

/// Outcome of a create-sheet-with-table flow.
#[derive(Debug)]
pub struct TableSummary {
    pub spreadsheet_id: String,
    pub total_rows: usize,
    pub data_rows: usize,
    pub sheet_rows: u32,
    pub sheet_columns: u32,
    pub batches: usize,
    pub has_headers: bool,
}

/// Coerce every inbound row to a positional array.
///
/// Keyed records are projected to `headers` order when headers are given
/// (missing or null values become empty strings); without headers they keep
/// their own insertion order. Scalars become single-cell rows.
pub fn normalize_rows(rows: Vec<Row>, headers: Option<&[String]>) -> Grid {
    rows.into_iter()
        .map(|row| match row {
            Row::Positional(cells) => cells,
            Row::Keyed(record) => match headers {
                Some(headers) => headers
                    .iter()
                    .map(|h| match record.get(h) {
                        Some(v) if !v.is_null() => v.clone(),
                        _ => Value::String(String::new()),
                    })
                    .collect(),
                None => record.into_values().collect(),
            },
            Row::Scalar(value) => vec![value],
        })
        .collect()
}

/// Build the full value grid for a new table sheet: a header row (explicit
/// headers, else the first keyed record's keys) followed by the data rows.
/// Returns the grid and whether a header row was prepended.
pub fn build_table_values(table_data: Vec<Row>, headers: Option<Vec<String>>) -> (Grid, bool) {
    let mut values: Grid = Vec::with_capacity(table_data.len() + 1);

    let explicit = headers.is_some();
    let header_row: Option<Vec<String>> = match &headers {
        Some(h) => Some(h.clone()),
        None => match table_data.first() {
            Some(Row::Keyed(record)) => Some(record.keys().cloned().collect()),
            _ => None,
        },
    };

    let has_headers = header_row.is_some();
    if let Some(h) = header_row {
        values.push(h.into_iter().map(Value::String).collect());
    }

    // Projection to header order only applies when headers were supplied
    // explicitly; derived headers leave keyed rows in their own order.
    let projection = if explicit { headers.as_deref() } else { None };
    values.extend(normalize_rows(table_data, projection));

    (values, has_headers)
}

/// Split `total` rows into `(start, end)` chunk bounds of at most
/// `CHUNK_ROWS` rows.
fn chunk_bounds(total: usize) -> Vec<(usize, usize)> {
    (0..total.div_ceil(CHUNK_ROWS))
        .map(|i| {
            let start = i * CHUNK_ROWS;
            (start, (start + CHUNK_ROWS).min(total))
        })
        .collect()
}

/// Split an A1-style cell like `B5` into its column letters and row number.
fn parse_cell(cell: &str) -> Result<(String, usize), SheetError> {
    let column: String = cell.chars().take_while(|c| c.is_ascii_alphabetic()).collect();
    let row: usize = cell[column.len()..]
        .parse()
        .map_err(|_| SheetError::Validation(format!("Invalid start cell: {cell}")))?;
    if column.is_empty() || row == 0 {
        return Err(SheetError::Validation(format!("Invalid start cell: {cell}")));
    }
    Ok((column.to_ascii_uppercase(), row))
}

fn chunk_range(sheet_name: &str, column: &str, start_row: usize, chunk_start: usize) -> String {
    format!("{}!{}{}", sheet_name, column, start_row + chunk_start)
}

/// Write a grid to an existing sheet in chunks of at most 1000 rows,
/// pausing for the fixed pacing delay between consecutive writes.
pub async fn chunk_and_write(
    sheets: &dyn SheetService,
    spreadsheet_id: &str,
    grid: &Grid,
    sheet_name: &str,
    start_cell: &str,
    clear_first: bool,
) -> Result<ExportSummary, SheetError> {
    if clear_first {
        sheets
            .clear_range(spreadsheet_id, &format!("{sheet_name}!A:ZZ"))
            .await?;
        tracing::debug!("cleared existing data in {}", sheet_name);
    }

    let (column, start_row) = parse_cell(start_cell)?;
    let bounds = chunk_bounds(grid.len());
    let batches = bounds.len();

    for (i, (start, end)) in bounds.iter().copied().enumerate() {
        let range = chunk_range(sheet_name, &column, start_row, start);
        tracing::debug!(
            "writing batch {}/{}: rows {} to {}",
            i + 1,
            batches,
            start + 1,
            end
        );
        let chunk: Grid = grid[start..end].to_vec();
        sheets.write_range(spreadsheet_id, &range, &chunk).await?;

        if i + 1 < batches {
            tokio::time::sleep(PACING_DELAY).await;
        }
    }

    Ok(ExportSummary {
        rows: grid.len(),
        columns: grid.first().map(Vec::len).unwrap_or(0),
        batches,
    })
}

/// Create a pre-sized spreadsheet, optionally relocate it, write the table in
/// chunks, and advisory-format the header row.
///
/// A chunk failing with a grid-limit error triggers one resize (rows grown to
/// cover that chunk plus slack) and one retry of that chunk; a second failure
/// propagates.
#[allow(clippy::too_many_arguments)]
pub async fn create_sheet_with_table(
    sheets: &dyn SheetService,
    assets: &dyn AssetService,
    title: &str,
    sheet_name: &str,
    folder_id: Option<&str>,
    table_data: Vec<Row>,
    headers: Option<Vec<String>>,
) -> Result<TableSummary, SheetError> {
    let data_rows = table_data.len();
    let (values, has_headers) = build_table_values(table_data, headers);

    let total_rows = values.len();
    let total_columns = values.first().map(Vec::len).unwrap_or(1);

    // Buffer beyond the data so small follow-up writes don't hit the grid
    // limit immediately.
    let required_rows = (total_rows + 100).max(1000) as u32;
    let required_columns = (total_columns + 5).max(26) as u32;

    let spreadsheet_id = sheets
        .create_spreadsheet(title, sheet_name, required_rows, required_columns)
        .await?;
    tracing::info!(
        "created spreadsheet {} ({} rows x {} columns)",
        spreadsheet_id,
        required_rows,
        required_columns
    );

    if let Some(folder) = folder_id {
        advisory(
            "move spreadsheet to folder",
            assets.move_to_folder(&spreadsheet_id, folder),
        )
        .await;
    }

    let bounds = chunk_bounds(total_rows);
    let batches = bounds.len();
    let mut current_rows = required_rows;

    for (i, (start, end)) in bounds.iter().copied().enumerate() {
        let range = format!("{}!A{}", sheet_name, start + 1);
        let chunk: Grid = values[start..end].to_vec();

        match sheets.write_range(&spreadsheet_id, &range, &chunk).await {
            Ok(()) => {}
            Err(e) if e.is_grid_too_small() => {
                let new_rows = ((end + 100) as u32).max(current_rows);
                tracing::warn!(
                    "batch {}/{} exceeded grid limits, resizing to {} rows and retrying",
                    i + 1,
                    batches,
                    new_rows
                );
                sheets
                    .resize_grid(&spreadsheet_id, new_rows, required_columns)
                    .await?;
                current_rows = new_rows;
                sheets.write_range(&spreadsheet_id, &range, &chunk).await?;
            }
            Err(e) => return Err(e.into()),
        }

        if i + 1 < batches {
            tokio::time::sleep(PACING_DELAY).await;
        }
    }

    if has_headers {
        advisory(
            "format header row",
            sheets.format_header_row(&spreadsheet_id, total_columns as u32),
        )
        .await;
    }

    Ok(TableSummary {
        spreadsheet_id,
        total_rows,
        data_rows,
        sheet_rows: current_rows,
        sheet_columns: required_columns,
        batches,
        has_headers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows_from(value: serde_json::Value) -> Vec<Row> {
        serde_json::from_value(value).unwrap()
    }

    // Order-sensitive rows must come from raw JSON text: a `json!` map is
    // key-sorted before `Row` ever sees it.
    fn rows_from_str(text: &str) -> Vec<Row> {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn keyed_rows_project_to_explicit_header_order() {
        let rows = rows_from(json!([{"a": 1, "b": 2}, {"b": 4, "a": 3}]));
        let headers = vec!["a".to_string(), "b".to_string()];
        let grid = normalize_rows(rows, Some(&headers));
        assert_eq!(grid, vec![vec![json!(1), json!(2)], vec![json!(3), json!(4)]]);
    }

    #[test]
    fn keyed_rows_without_headers_keep_insertion_order() {
        let rows = rows_from_str(r#"[{"b": 2, "a": 1}]"#);
        let grid = normalize_rows(rows, None);
        assert_eq!(grid, vec![vec![json!(2), json!(1)]]);
    }

    #[test]
    fn missing_and_null_keys_become_empty_strings() {
        let rows = rows_from(json!([{"a": 1, "c": null}]));
        let headers = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let grid = normalize_rows(rows, Some(&headers));
        assert_eq!(grid, vec![vec![json!(1), json!(""), json!("")]]);
    }

    #[test]
    fn mixed_shapes_normalize() {
        let rows = rows_from(json!([[1, 2], {"x": 3}, "scalar", 42]));
        let grid = normalize_rows(rows, None);
        assert_eq!(
            grid,
            vec![
                vec![json!(1), json!(2)],
                vec![json!(3)],
                vec![json!("scalar")],
                vec![json!(42)],
            ]
        );
    }

    #[test]
    fn table_values_prepend_explicit_headers() {
        let rows = rows_from(json!([{"a": 1, "b": 2}]));
        let (grid, has_headers) =
            build_table_values(rows, Some(vec!["a".to_string(), "b".to_string()]));
        assert!(has_headers);
        assert_eq!(grid[0], vec![json!("a"), json!("b")]);
        assert_eq!(grid[1], vec![json!(1), json!(2)]);
    }

    #[test]
    fn table_values_derive_headers_from_first_keyed_row() {
        let rows = rows_from_str(r#"[{"name": "x", "count": 1}]"#);
        let (grid, has_headers) = build_table_values(rows, None);
        assert!(has_headers);
        assert_eq!(grid[0], vec![json!("name"), json!("count")]);
    }

    #[test]
    fn table_values_without_headers_for_positional_data() {
        let rows = rows_from(json!([[1, 2], [3, 4]]));
        let (grid, has_headers) = build_table_values(rows, None);
        assert!(!has_headers);
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn chunk_bounds_split_at_1000() {
        assert_eq!(chunk_bounds(2500), vec![(0, 1000), (1000, 2000), (2000, 2500)]);
        assert_eq!(chunk_bounds(1000), vec![(0, 1000)]);
        assert_eq!(chunk_bounds(1), vec![(0, 1)]);
        assert!(chunk_bounds(0).is_empty());
    }

    #[test]
    fn parse_cell_splits_column_and_row() {
        assert_eq!(parse_cell("A1").unwrap(), ("A".to_string(), 1));
        assert_eq!(parse_cell("bc12").unwrap(), ("BC".to_string(), 12));
        assert!(parse_cell("123").is_err());
        assert!(parse_cell("A0").is_err());
        assert!(parse_cell("A").is_err());
    }

    #[test]
    fn chunk_ranges_offset_by_chunk_start() {
        assert_eq!(chunk_range("Data", "A", 1, 0), "Data!A1");
        assert_eq!(chunk_range("Data", "A", 1, 1000), "Data!A1001");
        assert_eq!(chunk_range("Data", "B", 5, 2000), "Data!B2005");
    }
}
