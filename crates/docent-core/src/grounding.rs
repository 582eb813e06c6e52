//! The grounding policy sent as the system instruction of every query.
//!
//! The canned phrases are public so front ends and tests can recognise the
//! backend's degenerate answers by exact match.

/// Reply when the answer is not in the submitted documents.
pub const NOT_FOUND_PHRASE: &str = "عذراً، لم أتمكن من العثور على إجابة لهذا السؤال في المستندات المتوفرة. يُفضل طرح السؤال على الأستاذ مباشرة.";

/// Reply to conversational or off-topic questions.
pub const OFF_TOPIC_PHRASE: &str = "أنا هنا لمساعدتك في الإجابة على الأسئلة المتعلقة بمحتوى المواد الدراسية. هل لديك أي استفسار حولها؟";

/// Reply asking the student to rephrase an ambiguous question.
pub const CLARIFICATION_PHRASE: &str = "لم أفهم سؤالك تماماً، هل يمكنك توضيحه أكثر؟";

/// A fixed instruction that keeps the backend's answers inside the supplied
/// documents.
///
/// Not editable at runtime; construct it once and share it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundingPolicy {
    instruction: String,
}

impl GroundingPolicy {
    /// Builds the instruction around the given canned phrases.
    pub fn with_phrases(not_found: &str, off_topic: &str, clarification: &str) -> Self {
        let instruction = format!(
            r#"أنت مساعد دراسي ذكي. مهمتك الأساسية هي الإجابة على أسئلة الطلاب بالاعتماد حصرياً على المعلومات الموجودة داخل ملفات PDF المحددة التي يتم تزويدك بها.

القواعد:
1.  مصدر معلوماتك الوحيد والمطلق هو محتوى ملفات الـ PDF. لا تستخدم أي معلومات من الإنترنت أو أي مصادر خارجية أخرى. إجاباتك يجب أن تكون 100% من المستندات.
2.  عندما لا تجد الإجابة في الملفات، يجب أن ترد بشكل مهذب وواضح باللغة العربية: "{not_found}"
3.  إذا طرح الطالب سؤالاً خارج نطاق المادة الدراسية (مثلاً: "كيف حالك؟" أو سؤال عام)، يجب أن تعتذر بلطف وتُذكّر بوظيفتك الأساسية باللغة العربية: "{off_topic}"
4.  إذا كان السؤال غامضاً، اطلب من الطالب إعادة صياغته بشكل أوضح باللغة العربية، مثال: "{clarification}"
5.  استخدم لغة عربية فصحى ومبسطة في إجاباتك.
6.  قدّم إجابات مختصرة ومباشرة. إذا كانت المعلومة طويلة، حاول تلخيصها مع الحفاظ على المضمون.
7.  عند تقديم الإجابة، من المفضل أن تذكر اسم الملف أو القسم في ملف الـ PDF الذي استخرجت منه المعلومة لزيادة الموثوقية.
"#
        );
        Self { instruction }
    }

    /// The full instruction text.
    pub fn instruction(&self) -> &str {
        &self.instruction
    }
}

impl Default for GroundingPolicy {
    fn default() -> Self {
        Self::with_phrases(NOT_FOUND_PHRASE, OFF_TOPIC_PHRASE, CLARIFICATION_PHRASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_instruction_carries_all_phrases() {
        let policy = GroundingPolicy::default();
        let text = policy.instruction();

        assert!(text.contains(NOT_FOUND_PHRASE));
        assert!(text.contains(OFF_TOPIC_PHRASE));
        assert!(text.contains(CLARIFICATION_PHRASE));
    }

    #[test]
    fn test_instruction_states_grounding_and_style_rules() {
        let text = GroundingPolicy::default().instruction().to_string();

        // documents only, no outside sources
        assert!(text.contains("حصرياً"));
        assert!(text.contains("لا تستخدم أي معلومات من الإنترنت"));
        // formal register, concise, cite the source
        assert!(text.contains("فصحى"));
        assert!(text.contains("مختصرة"));
        assert!(text.contains("اسم الملف"));
    }

    #[test]
    fn test_custom_phrases_are_embedded_verbatim() {
        let policy = GroundingPolicy::with_phrases("NOT FOUND", "OFF TOPIC", "UNCLEAR");
        let text = policy.instruction();
        assert!(text.contains("\"NOT FOUND\""));
        assert!(text.contains("\"OFF TOPIC\""));
        assert!(text.contains("\"UNCLEAR\""));
    }
}
