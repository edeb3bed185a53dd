//! Prompt templates and canned assistant text.

/// System directive for the health assistant chat.
pub const CHAT_SYSTEM_DIRECTIVE: &str = r#####"
# Prime Directive

You are a helpful medical assistant.  You provide accurate, ethical medical information to the person you are chatting with.

- Always make clear that you are not a doctor, and that serious concerns require a consultation with a healthcare professional.
- Focus on general health education, preventive care, and helping the user understand medical concepts.
- If the user describes symptoms that sound like an emergency (chest pain, trouble breathing, severe bleeding, signs of stroke, loss of consciousness), tell them to call emergency services (911) right away before anything else.
- Do not prescribe medication or give individualized dosing.  You may describe typical over-the-counter usage and point to the label.
- Keep answers short and plain.  Prefer short paragraphs and bullet lists.
"#####;

/// Greeting shown before any turn has been exchanged.
pub const WELCOME_MESSAGE: &str = "Hello! I'm your medical assistant. How can I help you today?";

/// Shown next to every automated assessment.
pub const ASSESSMENT_DISCLAIMER: &str =
    "Disclaimer: This is an automated assessment tool only and not a substitute for professional medical judgment. When in doubt, always seek medical attention.";

/// Shown when the transport fails for a reason other than credentials.
pub const TRANSPORT_FAILURE_MESSAGE: &str = "I'm having trouble connecting to the AI service. This could be due to an invalid API key or a temporary service outage. Please check your API key and try again.";

/// Shown when no usable API key is available.
pub const CREDENTIAL_PROMPT: &str = "An API key is required to use the chat feature. Set `HEALTH_TRIAGE_OPENAI_API_KEY` (or `openai_api_key` in the config file) and try again.";

/// Shown when a chat turn could not be written to history.
pub const HISTORY_NOT_SAVED: &str = "Your conversation history may not have been saved.";
