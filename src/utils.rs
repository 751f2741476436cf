/// File name for the `sequence`-th fragment persisted for `keyword`
pub fn fragment_file_name(keyword: &str, sequence: usize, extension: &str) -> String {
    // Keep the keyword as typed, but never let it name a different directory
    let keyword = keyword.replace(['/', '\\'], "_");
    format!("{}_{}.{}", keyword, sequence, extension)
}

/// Resolve HTML character references (`&amp;`, `&#38;`, ...) in plain text
pub fn unescape_html(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}
