// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortField {
    Id,
    Name,
    Role,
    Region,
}

impl SortField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Role => "role",
            Self::Region => "region",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PageSize {
    One,
    Five,
    #[default]
    Ten,
}

impl PageSize {
    pub const ALL: [Self; 3] = [Self::One, Self::Five, Self::Ten];

    pub const fn get(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Five => 5,
            Self::Ten => 10,
        }
    }

    pub fn from_value(value: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.get() == value)
    }

    /// The next option in the page size selector, wrapping around.
    pub fn cycled(self) -> Self {
        let index = Self::ALL
            .iter()
            .position(|size| *size == self)
            .unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FilterField {
    Id,
    Name,
    Role,
    Region,
}

impl FilterField {
    pub const ALL: [Self; 4] = [Self::Id, Self::Name, Self::Role, Self::Region];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Role => "role",
            Self::Region => "region",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Name => "Name",
            Self::Role => "Role",
            Self::Region => "Region",
        }
    }
}

/// Per-field filter values. An empty string means "no constraint".
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filters {
    id: String,
    name: String,
    role: String,
    region: String,
}

impl Filters {
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Id => &self.id,
            FilterField::Name => &self.name,
            FilterField::Role => &self.role,
            FilterField::Region => &self.region,
        }
    }

    pub fn set(&mut self, field: FilterField, value: impl Into<String>) {
        let slot = match field {
            FilterField::Id => &mut self.id,
            FilterField::Name => &mut self.name,
            FilterField::Role => &mut self.role,
            FilterField::Region => &mut self.region,
        };
        *slot = value.into();
    }

    pub fn is_empty(&self) -> bool {
        FilterField::ALL
            .iter()
            .all(|field| self.get(*field).is_empty())
    }

    pub fn active(&self) -> Vec<(FilterField, String)> {
        FilterField::ALL
            .iter()
            .filter(|field| !self.get(**field).is_empty())
            .map(|field| (*field, self.get(*field).to_owned()))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Id,
    Name,
    Role,
    Region,
    Skills,
    Deals,
    Clients,
}

impl Column {
    pub const ALL: [Self; 7] = [
        Self::Id,
        Self::Name,
        Self::Role,
        Self::Region,
        Self::Skills,
        Self::Deals,
        Self::Clients,
    ];

    pub const fn header(self) -> &'static str {
        match self {
            Self::Id => "ID",
            Self::Name => "Name",
            Self::Role => "Role",
            Self::Region => "Region",
            Self::Skills => "Skills",
            Self::Deals => "Deals",
            Self::Clients => "Clients",
        }
    }

    /// `None` for the aggregate count columns, which cannot be sorted.
    pub const fn sort_field(self) -> Option<SortField> {
        match self {
            Self::Id => Some(SortField::Id),
            Self::Name => Some(SortField::Name),
            Self::Role => Some(SortField::Role),
            Self::Region => Some(SortField::Region),
            Self::Skills | Self::Deals | Self::Clients => None,
        }
    }

    pub const fn is_sortable(self) -> bool {
        self.sort_field().is_some()
    }
}

/// Snapshot of everything one outbound request carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesRepQuery {
    pub page: u32,
    pub page_size: PageSize,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub filters: Vec<(FilterField, String)>,
}

impl Default for SalesRepQuery {
    fn default() -> Self {
        QueryState::default().to_query(false)
    }
}

impl SalesRepQuery {
    pub fn filter(&self, field: FilterField) -> Option<&str> {
        self.filters
            .iter()
            .find(|(candidate, _)| *candidate == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("page_size", self.page_size.get().to_string()),
            ("sort_by", self.sort_field.as_str().to_owned()),
            ("sort_order", self.sort_order.as_str().to_owned()),
        ];
        pairs.extend(
            self.filters
                .iter()
                .filter(|(_, value)| !value.is_empty())
                .map(|(field, value)| (field.as_str(), value.clone())),
        );
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    page: u32,
    page_size: PageSize,
    sort_field: SortField,
    sort_order: SortOrder,
    applied_filters: Filters,
    draft_filters: Filters,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(PageSize::default())
    }
}

impl QueryState {
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page: 1,
            page_size,
            sort_field: SortField::Id,
            sort_order: SortOrder::Asc,
            applied_filters: Filters::default(),
            draft_filters: Filters::default(),
        }
    }

    pub const fn page(&self) -> u32 {
        self.page
    }

    pub const fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub const fn sort_field(&self) -> SortField {
        self.sort_field
    }

    pub const fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    pub const fn applied_filters(&self) -> &Filters {
        &self.applied_filters
    }

    pub const fn draft_filters(&self) -> &Filters {
        &self.draft_filters
    }

    pub fn has_unapplied_draft(&self) -> bool {
        self.draft_filters != self.applied_filters
    }

    // The transitions below return true when page, page size, sort field or
    // sort order actually changed.

    pub fn set_page(&mut self, page: u32) -> bool {
        if page < 1 {
            return false;
        }
        let changed = page != self.page;
        self.page = page;
        changed
    }

    pub fn set_page_size(&mut self, page_size: PageSize) -> bool {
        let changed = page_size != self.page_size || self.page != 1;
        self.page_size = page_size;
        self.page = 1;
        changed
    }

    pub fn set_sort(&mut self, column: Column) -> bool {
        let Some(field) = column.sort_field() else {
            return false;
        };
        if field == self.sort_field {
            self.sort_order = self.sort_order.toggled();
        } else {
            self.sort_field = field;
            self.sort_order = SortOrder::Asc;
        }
        self.page = 1;
        true
    }

    pub fn edit_draft_filter(&mut self, field: FilterField, value: impl Into<String>) {
        self.draft_filters.set(field, value);
    }

    pub fn apply_filters(&mut self) {
        self.applied_filters = self.draft_filters.clone();
        self.page = 1;
    }

    pub fn reset_filters(&mut self) {
        self.draft_filters = Filters::default();
        self.applied_filters = Filters::default();
    }

    /// Snapshot for one request. Applied filters are only carried when
    /// `include_filters` is set, which the controller does for the request
    /// issued by apply. Page, sort and size requests go out unfiltered.
    pub fn to_query(&self, include_filters: bool) -> SalesRepQuery {
        SalesRepQuery {
            page: self.page,
            page_size: self.page_size,
            sort_field: self.sort_field,
            sort_order: self.sort_order,
            filters: if include_filters {
                self.applied_filters.active()
            } else {
                Vec::new()
            },
        }
    }
}
