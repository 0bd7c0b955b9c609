use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::{ReaderBuilder, StringRecord};
use shared::{CandlestickPoint, Series};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// Accepted header names per field, compared case-insensitively.
const TIME_HEADERS: &[&str] = &["time", "hora"];
const DATE_HEADERS: &[&str] = &["date", "data"];
const OPEN_HEADERS: &[&str] = &["open", "abertura"];
const HIGH_HEADERS: &[&str] = &["high", "máximo", "maximo"];
const LOW_HEADERS: &[&str] = &["low", "mínimo", "minimo"];
const CLOSE_HEADERS: &[&str] = &["close", "fechamento"];
const VOLUME_HEADERS: &[&str] = &["volume"];

/// Parses a decimal using explicit separators, e.g. "1.234,56" with ('.', ',').
/// `inf` and `NaN` are rejected: only finite prices and volumes are valid input.
pub fn parse_decimal(s: &str, thousand_separator: char, decimal_separator: char) -> Result<f64> {
    let normalized: String = s
        .trim()
        .chars()
        .filter(|&c| c != thousand_separator)
        .map(|c| if c == decimal_separator { '.' } else { c })
        .collect();

    let value = normalized
        .parse::<f64>()
        .map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))?;
    if !value.is_finite() {
        return Err(anyhow!("Failed to parse decimal '{}': value is not a finite number", s));
    }
    Ok(value)
}

/// Reads a delimited OHLCV file with a header row into a [`Series`].
///
/// Column order is free; headers are matched by name (English or the
/// Portuguese names used by B3 exports: Data;Hora;Abertura;Máximo;...).
#[derive(Debug, Clone, PartialEq)]
pub struct CsvSeriesLoader {
    pub delimiter: u8,
    pub thousand_separator: char,
    pub decimal_separator: char,
    pub date_format: String,
    pub time_format: String,
    pub label_format: String,
}

impl Default for CsvSeriesLoader {
    fn default() -> Self {
        Self {
            delimiter: b';',
            thousand_separator: '.',
            decimal_separator: ',',
            date_format: "%d/%m/%Y".to_string(),
            time_format: "%H:%M:%S".to_string(),
            label_format: "%d/%m/%Y %H:%M:%S".to_string(),
        }
    }
}

struct Columns {
    time: usize,
    date: Option<usize>,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl CsvSeriesLoader {
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Series> {
        let path = path.as_ref();
        let file = File::open(path).with_context(|| format!("Failed to open CSV file '{}'", path.display()))?;
        let series = self.load_reader(BufReader::new(file))?;
        tracing::info!(path = %path.display(), points = series.len(), "loaded series from CSV");
        Ok(series)
    }

    pub fn load_reader<R: Read>(&self, reader: R) -> Result<Series> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = rdr.headers().context("Failed to read CSV header row")?.clone();
        let columns = Self::resolve_columns(&headers)?;

        let mut points = Vec::new();
        for (idx, result) in rdr.records().enumerate() {
            // header is line 1
            let line = idx + 2;
            let record = result.with_context(|| format!("Error reading CSV record at line {}", line))?;
            points.push(self.parse_record(&record, &columns, line)?);
        }
        Ok(Series::new(points))
    }

    fn resolve_columns(headers: &StringRecord) -> Result<Columns> {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.trim().to_lowercase() == *n))
        };
        let require = |names: &[&str]| {
            find(names).ok_or_else(|| anyhow!("Missing '{}' column in CSV header", names[0]))
        };

        Ok(Columns {
            time: require(TIME_HEADERS)?,
            date: find(DATE_HEADERS),
            open: require(OPEN_HEADERS)?,
            high: require(HIGH_HEADERS)?,
            low: require(LOW_HEADERS)?,
            close: require(CLOSE_HEADERS)?,
            volume: require(VOLUME_HEADERS)?,
        })
    }

    fn parse_record(&self, record: &StringRecord, columns: &Columns, line: usize) -> Result<CandlestickPoint> {
        let field = |pos: usize, name: &str| {
            record
                .get(pos)
                .ok_or_else(|| anyhow!("Missing '{}' field in CSV record at line {}", name, line))
        };
        let number = |pos: usize, name: &str| -> Result<f64> {
            parse_decimal(field(pos, name)?, self.thousand_separator, self.decimal_separator)
                .with_context(|| format!("Error parsing '{}' at line {}", name, line))
        };

        let time_str = field(columns.time, "time")?;
        let time = match columns.date {
            Some(date_pos) => self
                .label_for(field(date_pos, "date")?, time_str)
                .with_context(|| format!("Error parsing date/time at line {}", line))?,
            None => time_str.to_string(),
        };

        Ok(CandlestickPoint {
            time,
            open: number(columns.open, "open")?,
            high: number(columns.high, "high")?,
            low: number(columns.low, "low")?,
            close: number(columns.close, "close")?,
            volume: number(columns.volume, "volume")?,
        })
    }

    fn label_for(&self, date_str: &str, time_str: &str) -> Result<String> {
        let date = NaiveDate::parse_from_str(date_str, &self.date_format)
            .map_err(|e| anyhow!("Failed to parse date '{}': {}", date_str, e))?;
        let time = NaiveTime::parse_from_str(time_str, &self.time_format)
            .map_err(|e| anyhow!("Failed to parse time '{}': {}", time_str, e))?;
        Ok(NaiveDateTime::new(date, time).format(&self.label_format).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    fn brazilian_loader() -> CsvSeriesLoader {
        CsvSeriesLoader::default()
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("123,45", '.', ',').unwrap(), 123.45);
        assert_eq!(parse_decimal("1.234,56", '.', ',').unwrap(), 1234.56);
        assert_eq!(parse_decimal("600.822.115,84", '.', ',').unwrap(), 600822115.84);
        assert_eq!(parse_decimal("42,100.5", ',', '.').unwrap(), 42100.5);
        assert!(parse_decimal("abc", ',', '.').is_err());
    }

    #[test]
    fn test_parse_decimal_rejects_non_finite() {
        for text in ["inf", "-inf", "infinity", "NaN", "nan"] {
            let err = parse_decimal(text, '.', ',').unwrap_err();
            assert!(err.to_string().contains("not a finite number"), "{}", text);
        }
    }

    #[test]
    fn test_non_finite_field_names_field_and_line() {
        let csv_content = "\
time;open;high;low;close;volume
10:00;100;110;90;105;10
11:00;105;inf;95;NaN;10";
        let err = brazilian_loader().load_reader(csv_content.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Error parsing 'high' at line 3"));
    }

    #[test]
    fn test_labels_keep_year_and_seconds() {
        let csv_content = "\
Data;Hora;Abertura;Máximo;Mínimo;Fechamento;Volume
30/12/2023;18:20:00;1;2;0,5;1,5;10
30/12/2024;18:20:00;1;2;0,5;1,5;10
30/12/2024;18:20:30;1;2;0,5;1,5;10";
        let series = brazilian_loader().load_reader(csv_content.as_bytes()).unwrap();
        let labels: Vec<&str> = series.iter().map(|p| p.time.as_str()).collect();
        assert_eq!(labels, vec!["30/12/2023 18:20:00", "30/12/2024 18:20:00", "30/12/2024 18:20:30"]);
    }

    #[test]
    fn test_load_brazilian_export() {
        let csv_content = "\
Ativo;Data;Hora;Abertura;Máximo;Mínimo;Fechamento;Volume;Quantidade
WINFUT;30/12/2024;18:20:00;124.080;124.090;123.938;123.983;600.822.115,84;24.228
WINFUT;30/12/2024;18:25:00;123.983;124.010;123.900;124.000;1.000.000,00;1000";
        let tmp_file = create_test_csv(csv_content);
        let series = brazilian_loader().load_file(tmp_file.path()).unwrap();

        assert_eq!(series.len(), 2);
        let first = series.get(0).unwrap();
        assert_eq!(first.time, "30/12/2024 18:20:00");
        assert_eq!(first.open, 124080.0);
        assert_eq!(first.high, 124090.0);
        assert_eq!(first.low, 123938.0);
        assert_eq!(first.close, 123983.0);
        assert_eq!(first.volume, 600822115.84);
        assert_eq!(series.get(1).unwrap().time, "30/12/2024 18:25:00");
    }

    #[test]
    fn test_load_plain_columns_any_order() {
        let csv_content = "\
volume,close,low,high,open,time
120,42280,41950,42350,42100,10:00
180,42190,42150,42500,42280,11:00";
        let loader = CsvSeriesLoader {
            delimiter: b',',
            thousand_separator: '_',
            decimal_separator: '.',
            ..CsvSeriesLoader::default()
        };
        let series = loader.load_reader(csv_content.as_bytes()).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(0).unwrap(), &CandlestickPoint::new("10:00", 42100.0, 42350.0, 41950.0, 42280.0, 120.0));
        assert_eq!(series.get(1).unwrap().time, "11:00");
    }

    #[test]
    fn test_header_only_yields_empty_series() {
        let tmp_file = create_test_csv("Data;Hora;Abertura;Máximo;Mínimo;Fechamento;Volume");
        let series = brazilian_loader().load_file(tmp_file.path()).unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn test_missing_column_is_reported() {
        let csv_content = "\
Data;Hora;Abertura;Máximo;Mínimo;Fechamento
30/12/2024;18:20:00;124.080;124.090;123.938;123.983";
        let err = brazilian_loader().load_reader(csv_content.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Missing 'volume' column"));
    }

    #[test]
    fn test_invalid_number_names_field_and_line() {
        let csv_content = "\
Data;Hora;Abertura;Máximo;Mínimo;Fechamento;Volume
30/12/2024;18:20:00;invalid;124.090;123.938;123.983;10";
        let err = brazilian_loader().load_reader(csv_content.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Error parsing 'open' at line 2"));
    }

    #[test]
    fn test_invalid_date_is_reported() {
        let csv_content = "\
Data;Hora;Abertura;Máximo;Mínimo;Fechamento;Volume
32/12/2024;18:20:00;1;2;0,5;1,5;10";
        let err = brazilian_loader().load_reader(csv_content.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Error parsing date/time at line 2"));
    }

    #[test]
    fn test_missing_file() {
        let result = CsvSeriesLoader::default().load_file("/definitely/not/here.csv");
        assert!(result.unwrap_err().to_string().contains("Failed to open CSV file"));
    }
}
