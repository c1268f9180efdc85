//! Candidate mining: paragraph prefilter, value normalisation, filing-date sniffing, structuring contract.

mod dates;
mod patterns;
mod prefilter;
mod structured;
mod value;

pub use dates::{FILING_DATE_SCAN_CHARS, filing_date_from_text, filing_date_iso};
pub use prefilter::{CONTEXT_CHARS, is_boilerplate, mine_candidates, mine_paragraph, prefilter, split_paragraphs};
pub use structured::{
    HeuristicStructurer, STRUCTURING_PROMPT, SourceDocument, Structurer, build_structuring_request,
    extract_document, parse_structured_response,
};
pub use value::{ValueSpan, normalize_value_span};
