//! Fixed risk-profile questionnaire.
//!
//! Read-only, process-wide. Every option scores 1 (cautious), 2 (balanced)
//! or 3 (risk-seeking).

use serde::Serialize;

/// One selectable answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AnswerOption {
    pub text: &'static str,
    pub score: u8,
}

/// One question with its three options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Question {
    pub id: u32,
    pub question: &'static str,
    pub options: &'static [AnswerOption],
}

impl Question {
    /// Score of the option at `index` (0-based).
    pub fn score_for_option(&self, index: usize) -> Option<u8> {
        self.options.get(index).map(|o| o.score)
    }
}

const fn opt(text: &'static str, score: u8) -> AnswerOption {
    AnswerOption { text, score }
}

static QUESTIONS: [Question; 12] = [
    Question {
        id: 1,
        question: "What is your primary investment goal?",
        options: &[
            opt("Preserve capital and generate stable income", 1),
            opt("Balance between growth and income", 2),
            opt("Maximize long-term capital appreciation", 3),
        ],
    },
    Question {
        id: 2,
        question: "How would you react if your portfolio dropped 20% in a month?",
        options: &[
            opt("Sell immediately to prevent further losses", 1),
            opt("Wait and monitor the situation closely", 2),
            opt("Buy more at lower prices", 3),
        ],
    },
    Question {
        id: 3,
        question: "What is your investment time horizon?",
        options: &[
            opt("Less than 3 years", 1),
            opt("3-7 years", 2),
            opt("More than 7 years", 3),
        ],
    },
    Question {
        id: 4,
        question: "What annual return do you expect from your investments?",
        options: &[
            opt("4-6% (preservation focused)", 1),
            opt("7-12% (balanced growth)", 2),
            opt("15%+ (aggressive growth)", 3),
        ],
    },
    Question {
        id: 5,
        question: "How much of your income do you allocate to investments?",
        options: &[
            opt("Less than 10%", 1),
            opt("10-25%", 2),
            opt("More than 25%", 3),
        ],
    },
    Question {
        id: 6,
        question: "How do you feel about investing in volatile growth stocks?",
        options: &[
            opt("Uncomfortable - I prefer stable, dividend-paying stocks", 1),
            opt("Okay with a small allocation", 2),
            opt("Excited - high risk, high reward", 3),
        ],
    },
    Question {
        id: 7,
        question: "What's your experience level with investing?",
        options: &[
            opt("Beginner - just starting out", 1),
            opt("Intermediate - a few years of experience", 2),
            opt("Advanced - extensive knowledge and experience", 3),
        ],
    },
    Question {
        id: 8,
        question: "How would you describe your current financial situation?",
        options: &[
            opt("Need to protect what I have", 1),
            opt("Stable with room for moderate risk", 2),
            opt("Very secure, can take significant risks", 3),
        ],
    },
    Question {
        id: 9,
        question: "Which best describes your preferred investment style?",
        options: &[
            opt("Value investing - buy undervalued, stable companies", 1),
            opt("Blend of value and growth strategies", 2),
            opt("Growth investing - focus on high-growth potential", 3),
        ],
    },
    Question {
        id: 10,
        question: "How often do you review and rebalance your portfolio?",
        options: &[
            opt("Rarely - I prefer a set-and-forget approach", 1),
            opt("Quarterly or semi-annually", 2),
            opt("Frequently - I actively manage my positions", 3),
        ],
    },
    Question {
        id: 11,
        question: "What's your view on emerging markets and speculative investments?",
        options: &[
            opt("Avoid them - too risky", 1),
            opt("Small allocation for diversification", 2),
            opt("Significant allocation for growth potential", 3),
        ],
    },
    Question {
        id: 12,
        question: "How important is regular income from your investments?",
        options: &[
            opt("Very important - I rely on dividends/income", 1),
            opt("Somewhat important", 2),
            opt("Not important - focused on capital gains", 3),
        ],
    },
];

/// Highest score a single option can carry.
pub const MAX_OPTION_SCORE: u8 = 3;

/// All questions in presentation order.
pub fn questions() -> &'static [Question] {
    &QUESTIONS
}

/// Look up a question by id.
pub fn question(id: u32) -> Option<&'static Question> {
    QUESTIONS.iter().find(|q| q.id == id)
}

/// Maximum attainable total score.
pub fn max_score() -> u32 {
    QUESTIONS.len() as u32 * u32::from(MAX_OPTION_SCORE)
}
