//! Canonical list query and its translation to request parameters.

use std::{fmt, str::FromStr};

pub const DEFAULT_PAGE_SIZE: u32 = 10;

pub const PARAM_SORT_BY: &str = "SortBy";
pub const PARAM_SORT_TYPE: &str = "SortType";
pub const PARAM_SEARCH_KEY: &str = "SearchKey";
pub const PARAM_PAGE_NO: &str = "PageNo";
pub const PARAM_PAGE_SIZE: &str = "PageSize";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Id,
    Name,
    Email,
    Department,
    DateOfBirth,
}

impl SortField {
    pub const ALL: [SortField; 5] = [
        SortField::Id,
        SortField::Name,
        SortField::Email,
        SortField::Department,
        SortField::DateOfBirth,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Email => "email",
            SortField::Department => "department",
            SortField::DateOfBirth => "doB",
        }
    }

    pub fn column_label(self) -> &'static str {
        match self {
            SortField::Id => "Id",
            SortField::Name => "Name",
            SortField::Email => "Email",
            SortField::Department => "Department",
            SortField::DateOfBirth => "Date Of Birth",
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSortField(pub String);

impl fmt::Display for UnknownSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown sort field '{}' (expected one of id, name, email, department, dob)",
            self.0
        )
    }
}

impl std::error::Error for UnknownSortField {}

impl FromStr for SortField {
    type Err = UnknownSortField;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let lowered = raw.trim().to_ascii_lowercase();
        let field = match lowered.as_str() {
            "id" => SortField::Id,
            "name" => SortField::Name,
            "email" => SortField::Email,
            "department" => SortField::Department,
            "dob" | "dateofbirth" | "date_of_birth" => SortField::DateOfBirth,
            _ => return Err(UnknownSortField(raw.to_string())),
        };
        Ok(field)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn wire_name(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    fn from_wire(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "asc" => Some(SortDirection::Ascending),
            "desc" => Some(SortDirection::Descending),
            _ => None,
        }
    }
}

/// Search, sort and paging parameters of the employee list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListQuery {
    pub search_key: Option<String>,
    pub sort_field: Option<SortField>,
    pub sort_direction: Option<SortDirection>,
    pub page_index: u32,
    pub page_size: u32,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }
}

impl ListQuery {
    pub fn with_page_size(page_size: u32) -> Self {
        Self {
            search_key: None,
            sort_field: None,
            sort_direction: None,
            page_index: 0,
            page_size: sanitize_page_size(page_size),
        }
    }

    /// Selecting a new field sorts ascending; re-selecting the current
    /// field flips between ascending and descending. There is no unsorted
    /// third state.
    pub fn toggle_sort(&mut self, field: SortField) {
        let direction = if self.sort_field == Some(field)
            && self.sort_direction == Some(SortDirection::Ascending)
        {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        self.sort_field = Some(field);
        self.sort_direction = Some(direction);
    }

    pub fn set_search_key(&mut self, key: &str) {
        self.search_key = sanitize_search_key(key);
    }

    pub fn set_page_size(&mut self, page_size: u32) {
        self.page_size = sanitize_page_size(page_size);
        self.page_index = 0;
    }

    /// Outgoing request parameters; absent fields are omitted entirely.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(5);
        if let Some(field) = self.sort_field {
            params.push((PARAM_SORT_BY, field.wire_name().to_string()));
        }
        if let Some(direction) = self.sort_direction {
            params.push((PARAM_SORT_TYPE, direction.wire_name().to_string()));
        }
        if let Some(key) = self.search_key.as_deref().and_then(non_blank) {
            params.push((PARAM_SEARCH_KEY, key.to_string()));
        }
        params.push((PARAM_PAGE_NO, self.page_index.to_string()));
        params.push((PARAM_PAGE_SIZE, sanitize_page_size(self.page_size).to_string()));
        params
    }

    /// Best-effort inverse of [`ListQuery::to_params`]. Unknown names and
    /// unparsable values are ignored.
    pub fn from_params<'a, I>(params: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut query = Self::default();
        for (name, value) in params {
            match name {
                PARAM_SORT_BY => query.sort_field = value.parse().ok(),
                PARAM_SORT_TYPE => query.sort_direction = SortDirection::from_wire(value),
                PARAM_SEARCH_KEY => query.set_search_key(value),
                PARAM_PAGE_NO => {
                    if let Ok(page) = value.trim().parse() {
                        query.page_index = page;
                    }
                }
                PARAM_PAGE_SIZE => {
                    if let Ok(size) = value.trim().parse() {
                        query.page_size = sanitize_page_size(size);
                    }
                }
                _ => {}
            }
        }
        query
    }
}

fn non_blank(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn sanitize_search_key(raw: &str) -> Option<String> {
    non_blank(raw).map(str::to_string)
}

fn sanitize_page_size(page_size: u32) -> u32 {
    if page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        page_size
    }
}
