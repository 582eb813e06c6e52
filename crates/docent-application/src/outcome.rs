//! The single value every grounded query resolves to.

use docent_core::{MessageRole, TranscriptEntry};

pub const MISSING_CREDENTIAL_MESSAGE: &str =
    "لم يتم إعداد مفتاح API بعد. يرجى إدخال المفتاح للمتابعة.";
pub const INVALID_CREDENTIAL_MESSAGE: &str =
    "مفتاح API غير صالح أو منتهي الصلاحية. يرجى إدخال مفتاح جديد.";
pub const BACKEND_FAILURE_MESSAGE: &str =
    "حدث خطأ أثناء محاولة الحصول على إجابة. يرجى المحاولة مرة أخرى.";
pub const READ_ERROR_MESSAGE: &str =
    "تعذّرت قراءة أحد الملفات المحددة. يرجى إعادة رفعه والمحاولة مرة أخرى.";
pub const EMPTY_SCOPE_MESSAGE: &str = "لا توجد ملفات في هذه المجموعة. يرجى إضافة ملفات أولاً.";
pub const STALE_SELECTION_MESSAGE: &str =
    "الملف المحدد لم يعد متوفراً في هذه المجموعة. يرجى اختيار ملف آخر.";
pub const BUSY_MESSAGE: &str = "جارٍ معالجة سؤال سابق. يرجى الانتظار حتى تكتمل الإجابة.";

/// Result of one `answer` call.
///
/// Every failure inside the query flow is folded into one of these variants;
/// nothing else crosses into the UI layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Backend text, verbatim.
    Answer(String),
    /// No credential on file; the backend was not contacted.
    MissingCredential,
    /// The backend rejected the credential; it has been cleared.
    InvalidCredential,
    /// Any other transport or backend failure.
    BackendFailure,
    /// A document in scope could not be read.
    ReadError { document: String },
    /// The group has no documents.
    EmptyScope,
    /// The selected document is not in the group.
    StaleSelection { document: String },
    /// Another question is still being answered.
    Busy,
}

impl Outcome {
    pub fn is_answer(&self) -> bool {
        matches!(self, Self::Answer(_))
    }

    /// User-facing text for this outcome.
    pub fn message(&self) -> &str {
        match self {
            Self::Answer(text) => text,
            Self::MissingCredential => MISSING_CREDENTIAL_MESSAGE,
            Self::InvalidCredential => INVALID_CREDENTIAL_MESSAGE,
            Self::BackendFailure => BACKEND_FAILURE_MESSAGE,
            Self::ReadError { .. } => READ_ERROR_MESSAGE,
            Self::EmptyScope => EMPTY_SCOPE_MESSAGE,
            Self::StaleSelection { .. } => STALE_SELECTION_MESSAGE,
            Self::Busy => BUSY_MESSAGE,
        }
    }

    pub fn role(&self) -> MessageRole {
        if self.is_answer() {
            MessageRole::Assistant
        } else {
            MessageRole::SystemError
        }
    }

    pub fn to_entry(&self) -> TranscriptEntry {
        TranscriptEntry::new(self.role(), self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answer_is_assistant_entry_with_verbatim_text() {
        let outcome = Outcome::Answer("  جواب\n".into());
        let entry = outcome.to_entry();
        assert_eq!(entry.role, MessageRole::Assistant);
        assert_eq!(entry.text, "  جواب\n");
    }

    #[test]
    fn test_failures_are_system_errors_with_distinct_messages() {
        let failures = [
            Outcome::MissingCredential,
            Outcome::InvalidCredential,
            Outcome::BackendFailure,
            Outcome::ReadError { document: "a.pdf".into() },
            Outcome::EmptyScope,
            Outcome::StaleSelection { document: "a.pdf".into() },
            Outcome::Busy,
        ];

        let mut seen = std::collections::HashSet::new();
        for failure in &failures {
            assert_eq!(failure.role(), MessageRole::SystemError);
            assert!(seen.insert(failure.message().to_string()), "{:?}", failure);
        }
        assert_ne!(
            Outcome::MissingCredential.message(),
            Outcome::InvalidCredential.message()
        );
    }
}
