/// Question asked before every entry and the roadmap are discarded.
pub const CLEAR_CONFIRMATION_QUESTION: &str = "Tüm kayıtlı analizler ve yol haritası silinsin mi?";

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&self, question: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, question: &str) -> bool {
        self(question)
    }
}

/// Approves without asking, for non-interactive use.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _question: &str) -> bool {
        true
    }
}
