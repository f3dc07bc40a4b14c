//! Batch input reading.
//!
//! The input is a CSV of part requests. Column headers are matched loosely
//! ("Part Number", "pn", "Qty", "Quantity", ...) because the files come
//! from whatever system exported the sourcing request. Rows with an
//! unusable quantity are skipped with a warning rather than failing the
//! whole batch.

use anyhow::{bail, Context, Result};
use quotient_core::PartRequest;
use std::path::Path;

#[derive(Debug, Default)]
struct ColumnMap {
    part_number: Option<usize>,
    quantity: Option<usize>,
    request_id: Option<usize>,
    customer_part_code: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let mut map = Self::default();
        for (index, header) in headers.iter().enumerate() {
            let name = header.trim().to_lowercase();
            match name.as_str() {
                "pn" | "part" | "part number" | "part_number" | "mpn" => {
                    map.part_number.get_or_insert(index);
                }
                "qty" | "quantity" | "qty requested" => {
                    map.quantity.get_or_insert(index);
                }
                "line" | "line number" | "request_id" | "rfq line" => {
                    map.request_id.get_or_insert(index);
                }
                "cpc" | "customer part code" | "customer_part_code" => {
                    map.customer_part_code.get_or_insert(index);
                }
                _ => {}
            }
        }
        map
    }
}

/// Read part requests from a CSV file, in file order.
pub fn read_part_requests(path: &Path) -> Result<Vec<PartRequest>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("cannot open input file {}", path.display()))?;

    let headers = reader.headers().context("input file has no header row")?;
    let columns = ColumnMap::from_headers(headers);

    // Fall back to positional columns when the headers are unrecognized
    let part_column = columns.part_number.unwrap_or(0);
    let quantity_column = columns.quantity.unwrap_or(1);

    let mut requests = Vec::new();
    for (row_index, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("bad CSV record at row {}", row_index + 2))?;

        let part_number = record.get(part_column).unwrap_or("").trim().to_string();
        let quantity_text = record.get(quantity_column).unwrap_or("").trim();

        if part_number.is_empty() && quantity_text.is_empty() {
            continue;
        }

        let Ok(quantity) = quantity_text.replace(',', "").parse::<u32>() else {
            tracing::warn!(
                row = row_index + 2,
                part = %part_number,
                quantity = quantity_text,
                "skipping row with unusable quantity"
            );
            continue;
        };

        let request_id = columns
            .request_id
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map_or_else(|| format!("L{}", row_index + 1), ToString::to_string);

        let customer_part_code = columns
            .customer_part_code
            .and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string);

        match PartRequest::new(request_id, part_number, quantity, customer_part_code) {
            Ok(request) => requests.push(request),
            Err(e) => tracing::warn!(row = row_index + 2, error = %e, "skipping invalid row"),
        }
    }

    if requests.is_empty() {
        bail!("no usable part requests in {}", path.display());
    }

    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(content.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn test_reads_named_columns() {
        let file = write_csv(
            "Line,CPC,Part Number,Qty\n\
             10,CPC-1,DS3231SN#,1000\n\
             20,,LM317T,250\n",
        );
        let requests = read_part_requests(file.path()).expect("read");

        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].request_id, "10");
        assert_eq!(requests[0].part_number, "DS3231SN#");
        assert_eq!(requests[0].quantity, 1000);
        assert_eq!(requests[0].customer_part_code.as_deref(), Some("CPC-1"));
        assert!(requests[1].customer_part_code.is_none());
    }

    #[test]
    fn test_falls_back_to_positional_columns() {
        let file = write_csv("a,b\nDS3231SN#,100\n");
        let requests = read_part_requests(file.path()).expect("read");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].part_number, "DS3231SN#");
        assert_eq!(requests[0].request_id, "L1");
    }

    #[test]
    fn test_skips_rows_with_bad_quantity() {
        let file = write_csv(
            "Part Number,Qty\n\
             DS3231SN#,not-a-number\n\
             LM317T,50\n",
        );
        let requests = read_part_requests(file.path()).expect("read");
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].part_number, "LM317T");
    }

    #[test]
    fn test_grouped_quantities_parse() {
        let file = write_csv("Part Number,Qty\nDS3231SN#,\"1,500\"\n");
        let requests = read_part_requests(file.path()).expect("read");
        assert_eq!(requests[0].quantity, 1500);
    }

    #[test]
    fn test_empty_file_is_an_error() {
        let file = write_csv("Part Number,Qty\n");
        assert!(read_part_requests(file.path()).is_err());
    }
}
