/// Fixed notification shown for every failed count.
pub const COUNT_FAILED_MESSAGE: &str =
    "TeXCount failed. Please refer to the texcount log output for details.";

/// Parsed texcount figures as handed over by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountReport {
    /// Raw digits captured after `Words in text:`.
    pub words: String,
    /// Value after `Number of floats/tables/figures:`, if present.
    pub floats: Option<u64>,
}

/// Human-readable sentence for a successful count.
///
/// The float clause is included only for a positive float count; `merge`
/// picks between the whole project and the opened file.
pub fn summary_message(report: &CountReport, merge: bool) -> String {
    let float_clause = match report.floats {
        Some(floats) if floats > 0 => {
            let noun = if floats == 1 { "float" } else { "floats" };
            format!("and {floats} {noun} (tables, figures, etc.) ")
        }
        _ => String::new(),
    };
    let target = if merge {
        "LaTeX project"
    } else {
        "opened LaTeX file"
    };
    format!(
        "There are {} words {float_clause}in the {target}.",
        report.words
    )
}
