use url::Url;

/// The headline numbers a profile shows under the name
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlineMetrics {
    pub rating: f64,
    pub student_count: u64,
    pub lesson_count: u64,
    pub attendance_pct: u32,
    pub response_pct: u32,
}

/// What the headline block of a profile held
///
/// Some profiles disclose only a name; that is a valid shape, not a
/// failure, and leaves every headline metric unset.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileData {
    Full {
        name: String,
        metrics: HeadlineMetrics,
    },
    NameOnly {
        name: String,
    },
}

impl ProfileData {
    pub fn name(&self) -> &str {
        match self {
            Self::Full { name, .. } | Self::NameOnly { name } => name,
        }
    }

    pub fn metrics(&self) -> Option<&HeadlineMetrics> {
        match self {
            Self::Full { metrics, .. } => Some(metrics),
            Self::NameOnly { .. } => None,
        }
    }
}

/// Normalized extraction result for one entity
///
/// `review_count` and `price` are never unset: a missing review block
/// reads as zero reviews and a price without a decimal token as `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityRecord {
    pub id: u64,
    pub name: String,
    pub rating: Option<f64>,
    pub student_count: Option<u64>,
    pub lesson_count: Option<u64>,
    pub attendance_pct: Option<u32>,
    pub response_pct: Option<u32>,
    pub review_count: u64,
    pub price: f64,
    pub canonical_url: Url,
}

impl EntityRecord {
    /// Flattens parsed profile data into a record with optional metrics
    pub fn from_profile(
        id: u64,
        data: ProfileData,
        review_count: u64,
        price: f64,
        canonical_url: Url,
    ) -> Self {
        let metrics = data.metrics().copied();
        let name = match data {
            ProfileData::Full { name, .. } | ProfileData::NameOnly { name } => name,
        };

        Self {
            id,
            name,
            rating: metrics.map(|m| m.rating),
            student_count: metrics.map(|m| m.student_count),
            lesson_count: metrics.map(|m| m.lesson_count),
            attendance_pct: metrics.map(|m| m.attendance_pct),
            response_pct: metrics.map(|m| m.response_pct),
            review_count,
            price,
            canonical_url,
        }
    }

    /// Returns true if the profile disclosed no headline metrics
    pub fn is_name_only(&self) -> bool {
        self.rating.is_none()
            && self.student_count.is_none()
            && self.lesson_count.is_none()
            && self.attendance_pct.is_none()
            && self.response_pct.is_none()
    }
}
