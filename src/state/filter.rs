/// Filter criteria typed into the list's filter bar, and the
/// query parameters they turn into.

/// Which filter input changed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Country,
    City,
    Category,
    MinRating,
}

/// Raw filter inputs; an empty string means "no filter"
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterCriteria {
    pub country: String,
    pub city: String,
    pub category: String,
    /// "" or a digit 1-5, as chosen in the rating picker
    pub min_rating: String,
}

impl FilterCriteria {
    pub fn set(&mut self, field: FilterField, value: String) {
        match field {
            FilterField::Country => self.country = value,
            FilterField::City => self.city = value,
            FilterField::Category => self.category = value,
            FilterField::MinRating => self.min_rating = value,
        }
    }

    /// Build the list query, dropping every criterion left empty
    pub fn to_query(&self) -> ListQuery {
        ListQuery {
            country: non_empty(&self.country),
            city: non_empty(&self.city),
            category: non_empty(&self.category),
            min_rating: self.min_rating.trim().parse().ok(),
            ..ListQuery::default()
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Every parameter the list endpoint understands. `None` is never sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub category: Option<String>,
    pub min_rating: Option<u8>,
    pub max_rating: Option<u8>,
    /// ISO timestamp lower bound on the visit date
    pub start_date: Option<String>,
    /// ISO timestamp upper bound on the visit date
    pub end_date: Option<String>,
}

impl ListQuery {
    /// Query-string pairs, in a stable order
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(value) = value {
                pairs.push((key, value));
            }
        };

        push("country", self.country.clone());
        push("city", self.city.clone());
        push("category", self.category.clone());
        push("min_rating", self.min_rating.map(|v| v.to_string()));
        push("max_rating", self.max_rating.map(|v| v.to_string()));
        push("start_date", self.start_date.clone());
        push("end_date", self.end_date.clone());
        push("skip", self.skip.map(|v| v.to_string()));
        push("limit", self.limit.map(|v| v.to_string()));

        pairs
    }
}
