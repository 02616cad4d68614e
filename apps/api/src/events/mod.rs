//! Static event catalog: the six competitions, their pricing and guidelines.

pub mod handlers;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Registration fee charged by the participant wizard, in INR.
pub const REGISTRATION_FEE_INR: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Art,
    Photography,
    Mehndi,
    Rangoli,
    Dance,
    Singing,
}

impl EventType {
    pub const ALL: [EventType; 6] = [
        EventType::Art,
        EventType::Photography,
        EventType::Mehndi,
        EventType::Rangoli,
        EventType::Dance,
        EventType::Singing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Art => "art",
            EventType::Photography => "photography",
            EventType::Mehndi => "mehndi",
            EventType::Rangoli => "rangoli",
            EventType::Dance => "dance",
            EventType::Singing => "singing",
        }
    }

    /// Single-letter code used in participant IDs.
    pub fn code(&self) -> char {
        match self {
            EventType::Art => 'A',
            EventType::Photography => 'P',
            EventType::Mehndi => 'M',
            EventType::Rangoli => 'R',
            EventType::Dance => 'D',
            EventType::Singing => 'S',
        }
    }

    /// "Art", "Photography", ...
    pub fn display_name(&self) -> &'static str {
        match self {
            EventType::Art => "Art",
            EventType::Photography => "Photography",
            EventType::Mehndi => "Mehndi",
            EventType::Rangoli => "Rangoli",
            EventType::Dance => "Dance",
            EventType::Singing => "Singing",
        }
    }

    pub fn title(&self) -> String {
        format!("Kalakriti {} Event", self.display_name())
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        EventType::ALL
            .into_iter()
            .find(|e| e.as_str() == needle)
            .ok_or_else(|| AppError::Validation(format!("Unknown event type '{}'", s.trim())))
    }
}

impl EventType {
    /// Parses an event type named in a URL path, where an unknown name is a
    /// missing resource rather than a bad request.
    pub fn from_path(segment: &str) -> Result<Self, AppError> {
        segment.parse().map_err(|e| match e {
            AppError::Validation(msg) => AppError::NotFound(msg),
            other => other,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Catalog
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub artworks: u32,
    pub price: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub title: String,
    pub description: &'static str,
    pub image: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    #[serde(rename = "type")]
    pub event_type: EventType,
    pub title: String,
    pub description: &'static str,
    pub full_description: &'static str,
    pub image: String,
    pub pricing: &'static [PricingTier],
    pub guidelines: &'static [&'static str],
    pub accepted_files: &'static str,
    pub registration_fee: u32,
}

impl EventDetails {
    pub fn price_for(&self, artworks: u32) -> Option<u32> {
        self.pricing
            .iter()
            .find(|tier| tier.artworks == artworks)
            .map(|tier| tier.price)
    }

    pub fn summary(&self) -> EventSummary {
        EventSummary {
            event_type: self.event_type,
            title: self.title.clone(),
            description: self.description,
            image: self.image.clone(),
        }
    }
}

const ART_PRICING: &[PricingTier] = &[
    PricingTier { artworks: 1, price: 299 },
    PricingTier { artworks: 2, price: 499 },
    PricingTier { artworks: 3, price: 699 },
];

const STANDARD_PRICING: &[PricingTier] = &[
    PricingTier { artworks: 1, price: 249 },
    PricingTier { artworks: 2, price: 399 },
    PricingTier { artworks: 3, price: 549 },
];

const DANCE_PRICING: &[PricingTier] = &[
    PricingTier { artworks: 1, price: 349 },
    PricingTier { artworks: 2, price: 599 },
    PricingTier { artworks: 3, price: 799 },
];

const ART_GUIDELINES: &[&str] = &[
    "Artwork must be original and created within the last 12 months",
    "Digital submissions should be high-resolution JPEG/PNG files",
    "Physical artwork photos should be well-lit and clear",
    "Each artwork must include a title and brief description",
    "Content should be appropriate for general audiences",
];

const PHOTOGRAPHY_GUIDELINES: &[&str] = &[
    "Photos must be taken within the last 12 months",
    "Basic editing is allowed, but heavily manipulated images should be submitted in the Digital Art category",
    "Minimum resolution of 3000px on the longest side",
    "Include camera and lens information if available",
    "Model releases may be required for recognizable people",
];

const MEHNDI_GUIDELINES: &[&str] = &[
    "Submit clear photographs of completed mehndi designs",
    "Include both close-up and full design images",
    "Natural henna must be used (no black henna or harmful chemicals)",
    "Provide information about the inspiration behind the design",
    "Self-application and application on models are both acceptable",
];

const RANGOLI_GUIDELINES: &[&str] = &[
    "Submit photographs showing the complete rangoli design",
    "Include progress photos if possible",
    "Specify materials used in the creation",
    "Provide the approximate dimensions of the design",
    "Traditional and contemporary designs are both welcome",
];

const DANCE_GUIDELINES: &[&str] = &[
    "Submit a video recording of your performance (2-5 minutes)",
    "Ensure good lighting and clear visibility of movements",
    "Music should be clearly audible",
    "Provide information about the dance style and concept",
    "Appropriate costumes enhancing the performance are recommended",
];

const SINGING_GUIDELINES: &[&str] = &[
    "Submit an audio or video recording of your performance (2-4 minutes)",
    "Cover songs and original compositions are both acceptable",
    "Ensure clear audio quality with minimal background noise",
    "Basic accompaniment is allowed but focus should be on vocals",
    "Provide information about the song selection and language",
];

pub fn event_details(event_type: EventType) -> EventDetails {
    let (description, full_description, pricing, guidelines, accepted_files): (
        &'static str,
        &'static str,
        &'static [PricingTier],
        &'static [&'static str],
        &'static str,
    ) = match event_type {
        EventType::Art => (
            "Showcase your artistic skills and creativity through various mediums including paintings, sketches, digital art, and more.",
            "The Kalakriti Art Event invites artists of all levels to express their creativity through various mediums. Whether you work with oils, acrylics, watercolors, or digital tools, this is your opportunity to showcase your unique artistic vision. Participants can submit multiple artworks and compete for recognition in different categories.",
            ART_PRICING,
            ART_GUIDELINES,
            "image/*",
        ),
        EventType::Photography => (
            "Capture moments, tell stories, and showcase your photography skills across various categories and themes.",
            "The Kalakriti Photography Event celebrates the art of visual storytelling through the lens. Photographers of all skill levels can participate by submitting their best shots in categories including Portrait, Landscape, Street, Wildlife, and Conceptual. Our panel of experts will evaluate entries based on composition, lighting, subject matter, and storytelling.",
            STANDARD_PRICING,
            PHOTOGRAPHY_GUIDELINES,
            "image/*",
        ),
        EventType::Mehndi => (
            "Demonstrate your mehndi application skills with intricate designs that blend traditional and contemporary styles.",
            "The Kalakriti Mehndi Event showcases the ancient art of henna application. Participants will demonstrate their skill in creating intricate patterns that may draw from traditional motifs or incorporate innovative designs. This competition celebrates the rich cultural heritage of mehndi while encouraging creative expression and technical excellence.",
            STANDARD_PRICING,
            MEHNDI_GUIDELINES,
            "image/*",
        ),
        EventType::Rangoli => (
            "Create vibrant and intricate rangoli designs using traditional or innovative techniques and materials.",
            "The Kalakriti Rangoli Event celebrates the traditional Indian art form of creating colorful designs on the floor. Participants will showcase their skill in making intricate patterns using materials like colored powders, flower petals, rice, or other innovative materials. This competition honors the cultural significance of rangoli while encouraging creativity and precision.",
            STANDARD_PRICING,
            RANGOLI_GUIDELINES,
            "image/*",
        ),
        EventType::Dance => (
            "Express yourself through movement and showcase your dance talents across various styles from classical to contemporary.",
            "The Kalakriti Dance Event invites dancers to express themselves through movement and rhythm. Participants can showcase their talents in various styles including Classical Indian, Folk, Contemporary, Hip Hop, and Fusion. Solo, duo, and group performances are welcome. Our judges will evaluate technique, expression, choreography, and overall presentation.",
            DANCE_PRICING,
            DANCE_GUIDELINES,
            "video/*",
        ),
        EventType::Singing => (
            "Showcase your vocal talent across different genres and styles in this premier singing competition.",
            "The Kalakriti Singing Event welcomes vocalists of all genres to showcase their musical talent. Whether you specialize in Classical, Bollywood, Western, Folk, or any other style, this competition provides a platform to demonstrate your vocal prowess. Participants will be judged on technical skill, tonal quality, expression, and overall performance.",
            ART_PRICING,
            SINGING_GUIDELINES,
            "audio/*,video/*",
        ),
    };

    EventDetails {
        event_type,
        title: event_type.title(),
        description,
        full_description,
        image: format!("/images/event-{}.jpg", event_type.as_str()),
        pricing,
        guidelines,
        accepted_files,
        registration_fee: REGISTRATION_FEE_INR,
    }
}

pub fn catalog() -> Vec<EventSummary> {
    EventType::ALL
        .into_iter()
        .map(|e| event_details(e).summary())
        .collect()
}
