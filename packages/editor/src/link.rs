use quire_model::BlockId;

/// `<document-url>#<block id>`, replacing any fragment already on the url
pub fn deep_link(document_url: &str, block: &BlockId) -> String {
    let base = document_url
        .split_once('#')
        .map(|(base, _)| base)
        .unwrap_or(document_url);
    format!("{}#{}", base, block)
}
