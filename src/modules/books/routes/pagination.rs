pub const DEFAULT_LIMIT: usize = 10;
pub const DEFAULT_OFFSET: usize = 0;

/// Query string accepted by `GET /books`.
///
/// Values are kept raw so that malformed numbers fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default)]
pub struct ListParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
    /// Switches the listing into a search when present
    pub q: Option<String>,
}

impl ListParams {
    /// Collect the known keys from decoded query pairs. A repeated key keeps
    /// its first value and unknown keys are ignored.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "limit" => &mut params.limit,
                "offset" => &mut params.offset,
                "q" => &mut params.q,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        params
    }

    /// Page size; missing, unparsable, zero or negative values give `DEFAULT_LIMIT`.
    pub fn limit(&self) -> usize {
        parse_count(self.limit.as_deref())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_LIMIT)
    }

    /// Items to skip; missing, unparsable or negative values give `DEFAULT_OFFSET`.
    pub fn offset(&self) -> usize {
        parse_count(self.offset.as_deref()).unwrap_or(DEFAULT_OFFSET)
    }
}

// Negative numbers parse as i64 and then fail the usize conversion.
fn parse_count(raw: Option<&str>) -> Option<usize> {
    raw?.trim()
        .parse::<i64>()
        .ok()
        .and_then(|n| usize::try_from(n).ok())
}

/// Items `[offset, offset + limit)` clamped to the collection bounds.
pub fn paginate<T>(items: Vec<T>, limit: usize, offset: usize) -> Vec<T> {
    items.into_iter().skip(offset).take(limit).collect()
}
