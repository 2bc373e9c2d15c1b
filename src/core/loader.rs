use crate::domain::model::{Inventory, Product};
use crate::domain::ports::InventoryConfig;
use crate::utils::error::{Result, ShopError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

pub const CURRENCY_SYMBOL: char = '£';

/// What the loader does with a line that is not `name,£price`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum MalformedLinePolicy {
    /// Fail the whole load on the first bad line.
    #[default]
    Abort,
    /// Drop the line and keep going.
    Skip,
}

impl MalformedLinePolicy {
    pub const VALUES: [&'static str; 2] = ["abort", "skip"];
}

impl fmt::Display for MalformedLinePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedLinePolicy::Abort => f.write_str("abort"),
            MalformedLinePolicy::Skip => f.write_str("skip"),
        }
    }
}

impl FromStr for MalformedLinePolicy {
    type Err = ShopError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(MalformedLinePolicy::Abort),
            "skip" => Ok(MalformedLinePolicy::Skip),
            other => Err(ShopError::InvalidConfigValueError {
                field: "on_malformed_line".to_string(),
                value: other.to_string(),
                reason: format!("Valid values: {}", Self::VALUES.join(", ")),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub records_read: u64,
    pub skipped: Vec<SkippedLine>,
}

#[derive(Debug, Clone)]
pub struct LoadedInventory {
    pub inventory: Inventory,
    pub report: LoadReport,
}

pub struct InventoryLoader {
    policy: MalformedLinePolicy,
}

impl InventoryLoader {
    pub fn new(policy: MalformedLinePolicy) -> Self {
        Self { policy }
    }

    /// 依設定開啟檔案並載入
    pub fn load_configured<C: InventoryConfig>(config: &C) -> Result<LoadedInventory> {
        Self::new(config.on_malformed_line()).load_path(config.inventory_path())
    }

    /// The file is closed before this returns, whatever the outcome.
    pub fn load_path<P: AsRef<Path>>(&self, path: P) -> Result<LoadedInventory> {
        let path = path.as_ref();
        tracing::debug!("Opening inventory source: {}", path.display());

        let file = File::open(path).map_err(|source| ShopError::SourceUnavailable { source })?;
        let loaded = self.load_reader(file)?;

        tracing::info!(
            "Loaded {} products from {} ({} skipped)",
            loaded.inventory.len(),
            path.display(),
            loaded.report.skipped.len()
        );
        Ok(loaded)
    }

    /// Line numbers are physical: blank lines are counted, never parsed.
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<LoadedInventory> {
        let mut reader = BufReader::new(reader);
        let mut splitter = csv::ReaderBuilder::new();
        splitter.has_headers(false).flexible(true).quoting(false);

        let mut products = Vec::new();
        let mut report = LoadReport::default();
        let mut buf = Vec::new();
        let mut record = csv::ByteRecord::new();
        let mut line: u64 = 0;

        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|source| ShopError::SourceUnavailable { source })?;
            if read == 0 {
                break;
            }
            line += 1;

            let content = strip_line_ending(&buf);
            if content.is_empty() {
                continue;
            }
            report.records_read += 1;

            let has_record = splitter
                .from_reader(content)
                .read_byte_record(&mut record)
                .map_err(|e| ShopError::SourceUnavailable { source: e.into() })?;
            if !has_record {
                continue;
            }

            match parse_record(&record) {
                Ok(product) => products.push(product),
                Err(reason) => match self.policy {
                    MalformedLinePolicy::Abort => return Err(ShopError::malformed(line, reason)),
                    MalformedLinePolicy::Skip => {
                        tracing::warn!("Skipping malformed inventory line {}: {}", line, reason);
                        report.skipped.push(SkippedLine { line, reason });
                    }
                },
            }
        }

        Ok(LoadedInventory {
            inventory: Inventory::new(products),
            report,
        })
    }
}

fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Parses one `name,£price` record. The error is the human-readable reason.
pub fn parse_record(record: &csv::ByteRecord) -> std::result::Result<Product, String> {
    if record.len() != 2 {
        return Err(format!("expected format name,{}price", CURRENCY_SYMBOL));
    }

    let mut fields = Vec::with_capacity(2);
    for raw in record.iter() {
        let text = std::str::from_utf8(raw).map_err(|_| "line is not valid UTF-8".to_string())?;
        fields.push(text);
    }
    parse_fields(fields[0], fields[1])
}

pub fn parse_fields(name: &str, price: &str) -> std::result::Result<Product, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err("product name is empty".to_string());
    }

    let price_text = price
        .trim()
        .strip_prefix(CURRENCY_SYMBOL)
        .ok_or_else(|| format!("price must start with {}", CURRENCY_SYMBOL))?;

    let price = price_text
        .parse::<f64>()
        .map_err(|e| format!("invalid price {:?}: {}", price_text, e))?;

    if !price.is_finite() || price < 0.0 {
        return Err("price must be a non-negative amount".to_string());
    }

    Ok(Product::new(name, price))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(policy: MalformedLinePolicy, text: &str) -> Result<LoadedInventory> {
        InventoryLoader::new(policy).load_reader(text.as_bytes())
    }

    #[test]
    fn test_parses_well_formed_lines_in_order() {
        let loaded = load(MalformedLinePolicy::Abort, "Apple,£0.50\n  Banana  , £0.30 \n").unwrap();
        let products = loaded.inventory.products();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0], Product::new("Apple", 0.5));
        assert_eq!(products[1], Product::new("Banana", 0.3));
        assert_eq!(loaded.report.records_read, 2);
        assert!(loaded.report.skipped.is_empty());
    }

    #[test]
    fn test_missing_comma_aborts_with_line_number() {
        let err = load(MalformedLinePolicy::Abort, "Apple\nBanana,£0.30\n").unwrap_err();
        match err {
            ShopError::MalformedRecord { line, reason } => {
                assert_eq!(line, 1);
                assert_eq!(reason, "expected format name,£price");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_each_malformed_shape_is_reported() {
        let cases = [
            ("Apple,£1,extra", "expected format name,£price"),
            ("  ,£1.00", "product name is empty"),
            ("Apple,1.00", "price must start with £"),
            ("Apple,$1.00", "price must start with £"),
            ("Apple,£-1", "price must be a non-negative amount"),
            ("Apple,£inf", "price must be a non-negative amount"),
        ];
        for (line, expected) in cases {
            let err = load(MalformedLinePolicy::Abort, line).unwrap_err();
            assert!(
                matches!(&err, ShopError::MalformedRecord { line: 1, reason } if reason == expected),
                "{line:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_non_numeric_price_includes_offending_text() {
        let err = load(MalformedLinePolicy::Abort, "Apple,£0.50\nPear,£abc\n").unwrap_err();
        match err {
            ShopError::MalformedRecord { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.starts_with("invalid price \"abc\""), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_skip_policy_drops_bad_lines_and_keeps_going() {
        let text = "Apple,£0.50\nbroken\nPear,£abc\nBanana,£0.30\n";
        let loaded = load(MalformedLinePolicy::Skip, text).unwrap();

        let names: Vec<_> = loaded.inventory.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Apple", "Banana"]);

        let skipped: Vec<_> = loaded.report.skipped.iter().map(|s| s.line).collect();
        assert_eq!(skipped, vec![2, 3]);
        assert_eq!(loaded.report.records_read, 4);
    }

    #[test]
    fn test_blank_lines_are_not_records() {
        let loaded = load(MalformedLinePolicy::Abort, "Apple,£0.50\n\nBanana,£0.30\n\n").unwrap();
        assert_eq!(loaded.inventory.len(), 2);
    }

    #[test]
    fn test_error_line_numbers_count_blank_lines() {
        let err = load(MalformedLinePolicy::Abort, "Apple,£0.50\n\nbroken\n").unwrap_err();
        assert!(matches!(err, ShopError::MalformedRecord { line: 3, .. }));
    }

    #[test]
    fn test_crlf_line_numbers_count_blank_lines() {
        let err = load(MalformedLinePolicy::Abort, "Apple,£0.50\r\n\r\nbroken\r\n").unwrap_err();
        assert!(matches!(err, ShopError::MalformedRecord { line: 3, .. }), "{err:?}");

        let err = load(MalformedLinePolicy::Abort, "\n\n\nA,£1\n\n\nbroken\n").unwrap_err();
        assert!(matches!(err, ShopError::MalformedRecord { line: 7, .. }), "{err:?}");
    }

    #[test]
    fn test_crlf_prices_parse_without_trailing_cr() {
        let loaded = load(MalformedLinePolicy::Abort, "Apple,£0.50\r\nBanana,£0.30\r\n").unwrap();
        assert_eq!(loaded.inventory.products()[1], Product::new("Banana", 0.3));
    }

    #[test]
    fn test_skipped_lines_keep_physical_numbers() {
        let text = "\r\nApple,£0.50\r\n\r\n\r\nbroken\r\nBanana,£0.30\r\n\r\nPear,0.10";
        let loaded = load(MalformedLinePolicy::Skip, text).unwrap();

        let skipped: Vec<_> = loaded.report.skipped.iter().map(|s| s.line).collect();
        assert_eq!(skipped, vec![5, 8]);
        assert_eq!(loaded.inventory.len(), 2);
        assert_eq!(loaded.report.records_read, 4);
    }

    #[test]
    fn test_invalid_utf8_is_malformed() {
        let bytes: &[u8] = b"Apple,\xa3\x31\n";
        let err = InventoryLoader::new(MalformedLinePolicy::Abort)
            .load_reader(bytes)
            .unwrap_err();
        assert!(matches!(err, ShopError::MalformedRecord { line: 1, .. }));
    }

    #[test]
    fn test_missing_file_is_source_failure() {
        let err = InventoryLoader::new(MalformedLinePolicy::Abort)
            .load_path("/definitely/not/here/values.txt")
            .unwrap_err();
        assert!(matches!(err, ShopError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("abort".parse::<MalformedLinePolicy>().unwrap(), MalformedLinePolicy::Abort);
        assert_eq!(" Skip ".parse::<MalformedLinePolicy>().unwrap(), MalformedLinePolicy::Skip);
        assert!("retry".parse::<MalformedLinePolicy>().is_err());
    }
}
