//! Prompt templates for each generation mode.
//!
//! Scene and app generation wrap the user's description in large fixed
//! templates; the model is expected to answer with a complete single-file
//! HTML document and nothing else.

/// Templates for assembling prompts per generation mode
pub struct PromptTemplate;

impl PromptTemplate {
    /// Fixed system instruction for the stateful chat session
    pub fn chat_system() -> &'static str {
        r#"You are a helpful, creative assistant.
Answer clearly and concisely. When the user shares an image, describe or use it as context for their request.
If you are unsure about something, say so rather than guessing."#
    }

    /// Prompt for 3D-scene document generation
    pub fn scene_document(description: &str) -> String {
        format!(
            r#"Create a complete, self-contained HTML document that renders an interactive 3D scene using three.js loaded from a CDN.

Scene description:
{description}

Requirements:
- A single HTML file with all JavaScript inline; no build step, no external assets beyond the three.js CDN script.
- Set up a perspective camera, ambient plus directional lighting, and OrbitControls so the scene can be explored with the mouse.
- Animate at least one element of the scene in the render loop.
- The canvas must fill the viewport and resize with the window.

Respond with ONLY the HTML document. Do not wrap it in markdown fences and do not add commentary before or after it."#
        )
    }

    /// Prompt for single-file web app generation
    pub fn app_document(description: &str) -> String {
        format!(
            r#"Create a complete, self-contained single-file web application.

App description:
{description}

Requirements:
- One HTML file containing all markup, styles and JavaScript inline; it must work when opened directly from disk.
- No external dependencies, no network requests, no build step.
- Give it a clean, usable interface with sensible keyboard and mouse interaction.
- Persist state with localStorage where it makes the app more useful.

Respond with ONLY the HTML document. Do not wrap it in markdown fences and do not add commentary before or after it."#
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_template_embeds_description() {
        let prompt = PromptTemplate::scene_document("a spinning red cube");
        assert!(prompt.contains("a spinning red cube"));
        assert!(prompt.contains("three.js"));
    }

    #[test]
    fn test_app_template_embeds_description() {
        let prompt = PromptTemplate::app_document("a pomodoro timer");
        assert!(prompt.contains("a pomodoro timer"));
        assert!(prompt.contains("single-file"));
    }

    #[test]
    fn test_chat_system_is_fixed() {
        assert_eq!(PromptTemplate::chat_system(), PromptTemplate::chat_system());
    }
}
