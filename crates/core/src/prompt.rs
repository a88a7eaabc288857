//! Blocking prompts
//!
//! Some operations need an explicit answer from the donor before they proceed: clearing the cart
//! asks yes/no, and confirming a payment asks for a transaction reference.

#[cfg(test)]
use mockall::automock;

/// A yes/no or free-text question put to the donor.
#[cfg_attr(test, automock)]
pub trait Prompt {
    /// Ask a yes/no question.
    fn confirm(&self, question: &str) -> bool;

    /// Ask for text. `None` means the donor dismissed the prompt.
    fn ask(&self, question: &str) -> Option<String>;
}

/// A prompt with answers decided up front.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixedPrompt {
    /// Answer to every yes/no question.
    pub confirm: bool,

    /// Answer to every text question.
    pub answer: Option<String>,
}

impl FixedPrompt {
    /// Answers yes, and gives `answer` to text questions.
    pub fn accept(answer: impl Into<String>) -> Self {
        Self {
            confirm: true,
            answer: Some(answer.into()),
        }
    }

    /// Answers no, and dismisses text questions.
    pub fn decline() -> Self {
        Self::default()
    }
}

impl Prompt for FixedPrompt {
    fn confirm(&self, _question: &str) -> bool {
        self.confirm
    }

    fn ask(&self, _question: &str) -> Option<String> {
        self.answer.clone()
    }
}
