//! Minimal typed model of the Adaptive Card schema subset netpulse emits.

use {serde::Serialize, serde_json::Value};

pub const SCHEMA_URL: &str = "http://adaptivecards.io/schemas/adaptive-card.json";
pub const SCHEMA_VERSION: &str = "1.2";

/// Root card document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdaptiveCard {
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub version: &'static str,
    pub body: Vec<Element>,
    pub actions: Vec<Action>,
}

impl AdaptiveCard {
    pub(crate) fn new(body: Vec<Element>, actions: Vec<Action>) -> Self {
        Self {
            schema: SCHEMA_URL,
            kind: "AdaptiveCard",
            version: SCHEMA_VERSION,
            body,
            actions,
        }
    }

    /// Depth-first walk over every text block in the body.
    pub fn texts(&self) -> Vec<&str> {
        fn walk<'a>(elements: &'a [Element], out: &mut Vec<&'a str>) {
            for element in elements {
                match element {
                    Element::TextBlock { text, .. } => out.push(text),
                    Element::ColumnSet { columns } => {
                        for column in columns {
                            walk(&column.items, out);
                        }
                    },
                    Element::FactSet { .. } | Element::ChoiceSet { .. } => {},
                }
            }
        }
        let mut out = Vec::new();
        walk(&self.body, &mut out);
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextSize {
    Small,
    Default,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextWeight {
    Lighter,
    Default,
    Bolder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Element {
    TextBlock {
        text: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        size: Option<TextSize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        weight: Option<TextWeight>,
        #[serde(skip_serializing_if = "std::ops::Not::not")]
        wrap: bool,
    },
    ColumnSet {
        columns: Vec<Column>,
    },
    FactSet {
        facts: Vec<Fact>,
    },
    #[serde(rename = "Input.ChoiceSet")]
    ChoiceSet {
        id: String,
        style: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        placeholder: Option<String>,
        choices: Vec<Choice>,
    },
}

impl Element {
    /// Plain, unstyled text block.
    pub fn text(text: impl Into<String>) -> Self {
        Self::TextBlock {
            text: text.into(),
            size: None,
            weight: None,
            wrap: false,
        }
    }

    /// Bold, wrapped heading.
    pub fn heading(text: impl Into<String>) -> Self {
        Self::TextBlock {
            text: text.into(),
            size: Some(TextSize::Medium),
            weight: Some(TextWeight::Bolder),
            wrap: true,
        }
    }
}

/// A column inside a [`Element::ColumnSet`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub items: Vec<Element>,
}

impl Column {
    pub fn new(items: Vec<Element>) -> Self {
        Self {
            kind: "Column",
            items,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fact {
    pub title: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub title: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Action {
    /// Posts `data` merged with the card's input values back to the bot.
    #[serde(rename = "Action.Submit")]
    Submit { title: String, data: Value },
}
