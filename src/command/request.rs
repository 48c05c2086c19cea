use thiserror::Error;

use crate::shared::time::TzOffset;

pub const TIMEZONE_OFFSET_HEADER: &str = "x-timezone-offset";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("invalid value {value:?} for query parameter '{name}'")]
    InvalidParam { name: &'static str, value: String },

    #[error("invalid value {value:?} for header '{name}'")]
    InvalidHeader { name: &'static str, value: String },
}

/// Query parameters and headers of an Arrow run search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRunsRequest {
    pub query: String,
    /// `None` means unbounded.
    pub limit: Option<usize>,
    pub offset: Option<String>,
    pub report_progress: bool,
    pub exclude_params: bool,
    pub exclude_traces: bool,
    /// Accepted for compatibility; it does not change the export.
    pub skip_system: bool,
    pub tz_offset: TzOffset,
}

impl Default for SearchRunsRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            limit: None,
            offset: None,
            report_progress: true,
            exclude_params: false,
            exclude_traces: false,
            skip_system: false,
            tz_offset: TzOffset::default(),
        }
    }
}

impl SearchRunsRequest {
    /// Parses the raw query string (without `?`) and the timezone header.
    /// Unknown parameters are ignored; the last occurrence of a repeated one wins.
    pub fn parse(query: Option<&str>, tz_header: Option<&str>) -> Result<Self, RequestError> {
        let mut req = SearchRunsRequest::default();

        for (name, value) in url::form_urlencoded::parse(query.unwrap_or_default().as_bytes()) {
            match name.as_ref() {
                "q" | "query" => req.query = value.into_owned(),
                "limit" => req.limit = parse_limit(&value)?,
                "offset" => {
                    req.offset = if value.is_empty() {
                        None
                    } else {
                        Some(value.into_owned())
                    }
                }
                "report_progress" => req.report_progress = parse_bool("report_progress", &value)?,
                "exclude_params" => req.exclude_params = parse_bool("exclude_params", &value)?,
                "exclude_traces" => req.exclude_traces = parse_bool("exclude_traces", &value)?,
                "skip_system" => req.skip_system = parse_bool("skip_system", &value)?,
                _ => {}
            }
        }

        if let Some(raw) = tz_header {
            req.tz_offset = parse_tz_offset(raw)?;
        }
        Ok(req)
    }
}

fn parse_limit(value: &str) -> Result<Option<usize>, RequestError> {
    if value.is_empty() {
        return Ok(None);
    }
    let limit: i64 = value.trim().parse().map_err(|_| RequestError::InvalidParam {
        name: "limit",
        value: value.to_string(),
    })?;
    Ok(usize::try_from(limit).ok().filter(|l| *l > 0))
}

fn parse_bool(name: &'static str, value: &str) -> Result<bool, RequestError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(RequestError::InvalidParam {
            name,
            value: value.to_string(),
        }),
    }
}

pub fn parse_tz_offset(raw: &str) -> Result<TzOffset, RequestError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(TzOffset::default());
    }
    trimmed
        .parse::<i32>()
        .map(TzOffset)
        .map_err(|_| RequestError::InvalidHeader {
            name: TIMEZONE_OFFSET_HEADER,
            value: raw.to_string(),
        })
}
