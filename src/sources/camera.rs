//! Livestream cameras at well-known scenic spots.

/// Keyword → livestream URL.
const CAMERAS: [(&str, &str); 6] = [
    ("101", "https://www.youtube.com/live/z_fY1pj1VBw?si=xomei9bt8s0mUW0C"),
    ("陽明山", "https://youtu.be/d9KuXrPCWYU"),
    ("三仙台", "https://youtu.be/dQ7Sd6PGLdA"),
    ("玉山", "https://tw.live/cam/?id=ttjykzx"),
    ("阿里山", "https://www.youtube.com/live/B6eki-0-w0g?si=extMBalIH_PHtEgW"),
    ("合歡山", "https://cctv-ss04.thb.gov.tw/T14A-d61a0c91"),
];

/// Immutable keyword table, exact match only.
#[derive(Debug, Clone)]
pub struct CameraTable {
    entries: Vec<(String, String)>,
}

impl CameraTable {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// URL for a keyword, or `None` when the text is not exactly a keyword.
    pub fn lookup(&self, keyword: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, url)| url.as_str())
    }
}

impl Default for CameraTable {
    fn default() -> Self {
        Self::new(CAMERAS)
    }
}

/// Still-frame URL for a camera. Plain concatenation, so `base` must not
/// already carry a query string for the result to be well formed.
pub fn snapshot_url(base: &str, unix_secs: i64) -> String {
    format!("{base}snapshot?t={unix_secs}")
}
