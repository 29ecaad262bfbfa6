//! Built-in course content so the backend is useful without a config file.

use crate::domain::{Certificate, FeedbackEntry, FeedbackFlag, LearningNode, QuizQuestion, TokenOption, Tone};
use crate::survey::{RatingBucket, SurveyOption, TrustSurvey};
use crate::tokentree::TokenTree;

fn goal(id: &str, title: &str, description: &str, hint: &str, prerequisites: &[&str], has_content: bool) -> LearningNode {
  LearningNode {
    id: id.into(),
    title: title.into(),
    description: description.into(),
    hint: hint.into(),
    prerequisites: prerequisites.iter().map(|p| p.to_string()).collect(),
    has_content,
  }
}

/// The skill tree, roughly in generation order.
pub fn seed_skill_nodes() -> Vec<LearningNode> {
  vec![
    // Foundations
    goal(
      "ai-text-generation",
      "How AI Produces Text",
      "Learn the fundamentals of how AI generates human-like text",
      "Discover how AI models use tokens and probability distributions to generate text. You'll learn why the same prompt can give different results!",
      &[],
      true,
    ),
    goal(
      "what-is-ai",
      "What is AI?",
      "A beginner-friendly introduction to artificial intelligence",
      "Learn the basics of what AI is, how it differs from traditional software, and why it matters today.",
      &[],
      false,
    ),
    goal(
      "ai-tools-overview",
      "AI Tools Overview",
      "Discover the landscape of AI tools available today",
      "Get an overview of popular AI tools and understand their strengths.",
      &[],
      false,
    ),
    // Core concepts
    goal(
      "temperature-randomness",
      "Temperature & Creativity",
      "Control how creative or focused AI responses are",
      "Learn how the temperature setting moves output between focused and unpredictable.",
      &["ai-text-generation"],
      false,
    ),
    goal(
      "ai-hallucinations",
      "Why AI Hallucinates",
      "Understand why AI sometimes makes things up",
      "Explore why models confidently generate false information.",
      &["ai-text-generation"],
      false,
    ),
    goal(
      "context-window",
      "Context Window Limits",
      "Understanding AI memory limitations",
      "Learn how much text a model can keep in view during a conversation and why it matters.",
      &["ai-text-generation"],
      false,
    ),
    goal(
      "choosing-ai-tool",
      "Choosing the Right AI",
      "Pick the best AI tool for your task",
      "Learn how to evaluate and choose between AI tools for a specific need.",
      &["ai-tools-overview"],
      false,
    ),
    goal(
      "ai-limitations",
      "AI Limitations",
      "Understand what AI cannot do",
      "Learn where current AI systems fall short.",
      &["what-is-ai"],
      false,
    ),
    // Applied knowledge
    goal(
      "prompt-engineering",
      "Prompt Engineering",
      "Learn to write effective prompts",
      "Write prompts that get better, more reliable results.",
      &["temperature-randomness"],
      false,
    ),
    goal(
      "fact-checking",
      "Fact-Checking AI",
      "Verify and validate AI-generated content",
      "Learn strategies for verifying AI-generated information.",
      &["ai-hallucinations"],
      false,
    ),
    goal(
      "ai-bias",
      "AI Bias & Fairness",
      "Recognize and mitigate AI biases",
      "See how biased training data shows up in answers.",
      &["ai-hallucinations"],
      false,
    ),
    goal(
      "long-conversations",
      "Managing Long Chats",
      "Keep AI on track in long conversations",
      "Keep context and quality up in extended conversations.",
      &["context-window"],
      false,
    ),
    // Advanced topics
    goal(
      "advanced-prompting",
      "Advanced Prompting",
      "Chain-of-thought and few-shot techniques",
      "Learn chain-of-thought reasoning and few-shot prompting.",
      &["prompt-engineering"],
      false,
    ),
    goal(
      "ethical-ai-use",
      "Ethical AI Use",
      "Responsible AI practices",
      "Explore attribution, disclosure and avoiding harm.",
      &["fact-checking", "ai-bias"],
      false,
    ),
    goal(
      "ai-for-coding",
      "AI for Coding",
      "Use AI to help write and debug code",
      "Use assistants for code generation and debugging.",
      &["advanced-prompting"],
      false,
    ),
    goal(
      "ai-for-writing",
      "AI for Writing",
      "Enhance your writing with AI assistance",
      "Use AI for brainstorming and editing.",
      &["advanced-prompting"],
      false,
    ),
  ]
}

fn certificate(id: &str, title: &str, description: &str, icon: &str, color: &str, goals: &[&str]) -> Certificate {
  Certificate {
    id: id.into(),
    title: title.into(),
    description: description.into(),
    icon: icon.into(),
    color: color.into(),
    required_goals: goals.iter().map(|g| g.to_string()).collect(),
  }
}

pub fn seed_certificates() -> Vec<Certificate> {
  vec![
    certificate(
      "ai-fundamentals",
      "AI Fundamentals",
      "Master the basics of how AI works and its limitations",
      "🎓",
      "amber",
      &["ai-text-generation", "ai-hallucinations", "fact-checking"],
    ),
    certificate(
      "prompt-master",
      "Prompt Master",
      "Become an expert at crafting effective AI prompts",
      "✨",
      "purple",
      &["ai-text-generation", "temperature-randomness", "prompt-engineering", "advanced-prompting"],
    ),
    certificate(
      "responsible-ai",
      "Responsible AI User",
      "Learn to use AI ethically and responsibly",
      "🛡️",
      "emerald",
      &["what-is-ai", "ai-limitations", "ai-hallucinations", "ai-bias", "ethical-ai-use"],
    ),
    certificate(
      "ai-developer",
      "AI-Assisted Developer",
      "Use AI effectively for coding and development",
      "💻",
      "blue",
      &["ai-text-generation", "prompt-engineering", "advanced-prompting", "ai-for-coding"],
    ),
    certificate(
      "ai-writer",
      "AI-Powered Writer",
      "Enhance your writing with AI assistance",
      "✍️",
      "rose",
      &["ai-text-generation", "temperature-randomness", "prompt-engineering", "ai-for-writing"],
    ),
  ]
}

fn question(text: &str, options: [&str; 4], correct_answer: usize) -> QuizQuestion {
  QuizQuestion {
    question: text.into(),
    options: options.iter().map(|o| o.to_string()).collect(),
    correct_answer,
  }
}

pub fn seed_quiz_questions() -> Vec<QuizQuestion> {
  vec![
    question(
      "What is a token in the context of AI language models?",
      [
        "A small piece of text that the AI processes",
        "A type of computer memory",
        "A programming language",
        "A database entry",
      ],
      0,
    ),
    question(
      "How does an AI model choose the next token?",
      [
        "It always picks the most common word",
        "It randomly selects from all possible words",
        "It calculates probabilities and selects based on likelihood",
        "It copies from a database of sentences",
      ],
      2,
    ),
    question(
      "Can neutral tokens lead to different tones in a sentence?",
      [
        "No, neutral tokens always stay neutral",
        "Yes, depending on the tokens that follow",
        "Only in formal writing",
        "Tone is not affected by token choice",
      ],
      1,
    ),
  ]
}

fn leaf(token: &str, probability: f64, tone: Tone, final_text: &str) -> TokenOption {
  TokenOption {
    token: token.into(),
    probability,
    tone: Some(tone),
    options: Vec::new(),
    final_text: Some(final_text.into()),
  }
}

fn branch(token: &str, probability: f64, tone: Tone, options: Vec<TokenOption>) -> TokenOption {
  TokenOption { token: token.into(), probability, tone: Some(tone), options, final_text: None }
}

/// Three decisions deep; the first wheel is I / really / was / must.
pub fn seed_token_tree() -> TokenTree {
  TokenTree {
    prompt: "About the report you sent yesterday,".into(),
    options: vec![
      branch("I", 0.5, Tone::Neutral, vec![
        branch("really", 0.6, Tone::Nice, vec![
          leaf("appreciate", 0.7, Tone::Nice, "the effort you put in."),
          leaf("wonder", 0.3, Tone::PassiveAggressive, "whether you read my notes."),
        ]),
        branch("was", 0.4, Tone::Neutral, vec![
          leaf("glad", 0.5, Tone::Nice, "to finally see it."),
          leaf("surprised", 0.5, Tone::PassiveAggressive, "it took this long."),
        ]),
      ]),
      branch("really", 0.3, Tone::Nice, vec![
        branch("great", 0.7, Tone::Nice, vec![leaf("job", 1.0, Tone::Nice, "on the charts.")]),
        branch("late", 0.3, Tone::PassiveAggressive, vec![leaf("again", 1.0, Tone::PassiveAggressive, "but thanks.")]),
      ]),
      branch("was", 0.15, Tone::Neutral, vec![
        branch("it", 1.0, Tone::Neutral, vec![
          leaf("finished", 0.5, Tone::Neutral, "or is more coming?"),
          leaf("rushed", 0.5, Tone::PassiveAggressive, "because it reads that way."),
        ]),
      ]),
      branch("must", 0.05, Tone::Neutral, vec![
        branch("say", 1.0, Tone::Neutral, vec![
          leaf("wow", 0.5, Tone::Nice, "this is thorough."),
          leaf("honestly", 0.5, Tone::PassiveAggressive, "I expected more."),
        ]),
      ]),
    ],
  }
}

fn survey_option(value: u8, label: &str, description: &str) -> SurveyOption {
  SurveyOption { value, label: label.into(), description: description.into() }
}

pub fn seed_trust_survey() -> TrustSurvey {
  let options = vec![
    survey_option(1, "Never the same", "Every response is completely different"),
    survey_option(2, "Rarely the same", "Mostly different with occasional similarities"),
    survey_option(3, "Sometimes the same", "About 50/50 similar and different"),
    survey_option(4, "Usually the same", "Mostly similar with minor variations"),
    survey_option(5, "Always the same", "Identical or nearly identical every time"),
  ];
  let baseline = options
    .iter()
    .zip([42, 78, 182, 145, 73])
    .map(|(o, count)| RatingBucket { rating: o.value, label: o.label.clone(), count })
    .collect();
  TrustSurvey {
    question: "How often do you think an LLM produces the same answer for the same prompt?".into(),
    options,
    baseline,
  }
}

fn feedback(
  id: &str,
  objective: &str,
  resource: &str,
  content_id: &str,
  flag: FeedbackFlag,
  text: &str,
  timestamp: &str,
  university: &str,
) -> FeedbackEntry {
  FeedbackEntry {
    id: id.into(),
    learning_objective: objective.into(),
    resource: resource.into(),
    content_id: content_id.into(),
    flag,
    text: text.into(),
    timestamp: timestamp.into(),
    university: university.into(),
  }
}

/// Sample entries for the admin panel.
pub fn seed_feedback() -> Vec<FeedbackEntry> {
  const TEXT_GOAL: &str = "Understanding How AI Produces Text";
  const STORY: &str = "Story-driven Course";
  use FeedbackFlag::*;
  vec![
    feedback("1", TEXT_GOAL, STORY, "step-1", GeneralFeedback,
      "The opening dialogue is engaging but could use more context about what Spezi was trying to do.",
      "2026-01-27 10:30", "TU Munich"),
    feedback("2", TEXT_GOAL, STORY, "step-3.2", TechnicalError,
      "The survey options are cut off on mobile devices.", "2026-01-27 11:15", "LMU Munich"),
    feedback("3", TEXT_GOAL, STORY, "step-6", FalseInformation,
      "Tokens can also include special characters like emojis, this should be mentioned.",
      "2026-01-27 12:00", "TU Munich"),
    feedback("4", TEXT_GOAL, STORY, "step-7.2", GeneralFeedback,
      "The spinner visual is great! Maybe add more examples with different probability distributions.",
      "2026-01-27 14:20", "University of Stuttgart"),
    feedback("5", TEXT_GOAL, STORY, "step-7.5", TechnicalError,
      "Token simulator wheel sometimes gets stuck when clicking rapidly.", "2026-01-27 15:45", "RWTH Aachen"),
    feedback("6", TEXT_GOAL, STORY, "step-9", FalseInformation,
      "Question 2 answer explanation could be clearer about why option B is incorrect.",
      "2026-01-27 16:30", "TU Munich"),
    feedback("7", "AI Ethics Fundamentals", "Video Course", "video-intro-1", GeneralFeedback,
      "Video quality is good but subtitles are slightly out of sync.", "2026-01-26 09:00", "LMU Munich"),
    feedback("8", "Prompt Engineering Basics", STORY, "step-2", TechnicalError,
      "Image of Dr. Puck not loading correctly on Safari.", "2026-01-26 11:30", "University of Heidelberg"),
  ]
}
