use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque listing identifier assigned by the remote store on insert.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(pub String);

impl ListingId {
    /// Placeholder used between validation and the remote store's id assignment.
    pub fn pending() -> Self {
        Self(String::new())
    }

    pub fn is_pending(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId(pub String);

impl AgentId {
    pub fn pending() -> Self {
        Self(String::new())
    }

    pub fn is_pending(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A property record. `is_active` is the sole discriminator between the
/// active and inactive table projections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub title: String,
    pub description: String,
    pub price: f64,
    pub is_active: bool,
    pub main_image: String,
    #[serde(default)]
    pub additional_images: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Raw form input for a new listing. `price` arrives as the text the form
/// produced and is parsed during validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingDraft {
    pub title: String,
    pub description: String,
    pub price: String,
    pub main_image: String,
    #[serde(default)]
    pub additional_images: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// A staff profile. `image` is optional; display falls back to initials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub first_name: String,
    pub surname: String,
    pub email: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentDraft {
    pub first_name: String,
    pub surname: String,
    pub email: String,
    pub image: String,
}

/// Field-level rejection raised by draft validation and field edits.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    MissingField(&'static str),
    #[error("price '{0}' is not a number")]
    PriceNotNumeric(String),
    #[error("price must not be negative, got {0}")]
    NegativePrice(f64),
}

pub(crate) fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::MissingField(field))
    } else {
        Ok(())
    }
}

pub(crate) fn validate_price(price: f64) -> Result<(), ValidationError> {
    if !price.is_finite() {
        return Err(ValidationError::PriceNotNumeric(price.to_string()));
    }
    if price < 0.0 {
        return Err(ValidationError::NegativePrice(price));
    }
    Ok(())
}

fn parse_price(raw: &str) -> Result<f64, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField("price"));
    }
    let price: f64 = trimmed
        .parse()
        .map_err(|_| ValidationError::PriceNotNumeric(trimmed.to_string()))?;
    validate_price(price)?;
    Ok(price)
}

impl Listing {
    /// Validate a draft and build the listing it describes. New listings
    /// always start active; the id stays pending until the remote store
    /// confirms the insert.
    pub fn from_draft(draft: ListingDraft) -> Result<Self, ValidationError> {
        require_non_empty("title", &draft.title)?;
        require_non_empty("description", &draft.description)?;
        require_non_empty("main image", &draft.main_image)?;
        let price = parse_price(&draft.price)?;

        Ok(Self {
            id: ListingId::pending(),
            title: draft.title,
            description: draft.description,
            price,
            is_active: true,
            main_image: draft.main_image,
            additional_images: draft.additional_images,
            categories: draft.categories,
        })
    }
}

impl Agent {
    pub fn from_draft(draft: AgentDraft) -> Result<Self, ValidationError> {
        require_non_empty("first name", &draft.first_name)?;
        require_non_empty("surname", &draft.surname)?;
        require_non_empty("email", &draft.email)?;
        require_non_empty("image", &draft.image)?;

        Ok(Self {
            id: AgentId::pending(),
            first_name: draft.first_name,
            surname: draft.surname,
            email: draft.email,
            image: Some(draft.image),
        })
    }

    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.surname)
    }

    /// Avatar fallback when no image is set.
    pub fn initials(&self) -> String {
        let mut initials = String::new();
        for part in [&self.first_name, &self.surname] {
            if let Some(first) = part.trim().chars().next() {
                initials.extend(first.to_uppercase());
            }
        }
        initials
    }
}

/// Case-insensitive email lookup used for chat-partner matching.
pub fn find_agent_by_email<'a>(agents: &'a [Agent], email: &str) -> Option<&'a Agent> {
    agents
        .iter()
        .find(|agent| agent.email.eq_ignore_ascii_case(email))
}
