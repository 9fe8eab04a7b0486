use crate::config::JoinSeparator;

/// Translation of one non-blank segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslatedSegment {
    /// Index of the source segment this translates
    pub index: usize,
    pub text: String,
}

/// Join translated segments in index order.
///
/// Skipped blank segments leave gaps in the indices; those are simply absent
/// from the output, the remaining segments keep their relative order.
pub fn reassemble(mut segments: Vec<TranslatedSegment>, separator: JoinSeparator) -> String {
    segments.sort_by_key(|segment| segment.index);

    let mut output = String::with_capacity(
        segments.iter().map(|s| s.text.len() + 1).sum::<usize>(),
    );
    for (position, segment) in segments.iter().enumerate() {
        if position > 0 {
            output.push_str(separator.as_str());
        }
        output.push_str(&segment.text);
    }
    output
}
