#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoodFilter {
    All,
    /// Listings whose `addedBy.email` equals the given email
    AddedBy(String),
    /// Exact name match
    Name(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FoodOrder {
    #[default]
    Insertion,
    MostPurchased,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoodListCriteria {
    filter: FoodFilter,
    order: FoodOrder,
    limit: Option<u64>,
}

impl FoodListCriteria {
    pub fn all() -> Self {
        Self::new(FoodFilter::All, FoodOrder::Insertion, None)
    }

    pub fn added_by(email: impl Into<String>) -> Self {
        Self::new(FoodFilter::AddedBy(email.into()), FoodOrder::Insertion, None)
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self::new(FoodFilter::Name(name.into()), FoodOrder::Insertion, None)
    }

    pub fn most_purchased(limit: u64) -> Self {
        Self::new(FoodFilter::All, FoodOrder::MostPurchased, Some(limit))
    }

    pub fn new(filter: FoodFilter, order: FoodOrder, limit: Option<u64>) -> Self {
        Self {
            filter,
            order,
            limit,
        }
    }

    pub fn filter(&self) -> &FoodFilter {
        &self.filter
    }

    pub fn order(&self) -> FoodOrder {
        self.order
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }
}
