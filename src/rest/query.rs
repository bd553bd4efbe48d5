//! Paged queries over a collection.
//!
//! A [`Query`] holds a filter, an ordering and a page size, and fetches
//! pages of collection members with them. The total number of matches is
//! cached after the first request and invalidated whenever the filter
//! changes.
//!
//! The API filters on one field or one special query at a time.
//!
//! # Example
//!
//! ```rust,ignore
//! use billogram_api::rest::OrderDirection;
//!
//! let mut query = api.customers().query();
//! query.filter_prefix("name", "Ture").order_by("created_at", OrderDirection::Desc);
//!
//! println!("{} matches on {} pages", query.count().await?, query.total_pages().await?);
//!
//! let mut all = query.iter_all();
//! while let Some(customer) = all.next().await {
//!     println!("{}", customer?.get("name")?);
//! }
//! ```

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::clients::{HttpClient, ResponseEnvelope};
use crate::rest::{FromRemoteObject, ObjectType, RemoteObject, ResourceError};

/// The page size used unless another is set.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// How a filter value is matched against a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterType {
    /// Exact match on a field.
    Field,
    /// Prefix match on a field.
    FieldPrefix,
    /// Substring match on a field.
    FieldSearch,
    /// A special query defined by the object type (e.g., `search`).
    Special,
}

impl FilterType {
    /// Returns the wire name of the filter type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::FieldPrefix => "field-prefix",
            Self::FieldSearch => "field-search",
            Self::Special => "special",
        }
    }
}

impl fmt::Display for FilterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterType {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "field" => Ok(Self::Field),
            "field-prefix" => Ok(Self::FieldPrefix),
            "field-search" => Ok(Self::FieldSearch),
            "special" => Ok(Self::Special),
            other => Err(ResourceError::invalid_argument(
                "filter_type",
                format!("unknown filter type '{other}'"),
            )),
        }
    }
}

/// A complete filter: type, field and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    /// How the value is matched.
    pub filter_type: FilterType,
    /// The field (or special query name) to filter on.
    pub field: String,
    /// The value to match.
    pub value: String,
}

impl Filter {
    /// Creates a filter.
    #[must_use]
    pub fn new(filter_type: FilterType, field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            filter_type,
            field: field.into(),
            value: value.into(),
        }
    }

    /// Builds a filter from `filter_type`/`filter_field`/`filter_value`
    /// arguments.
    ///
    /// Empty arguments mean no filter.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] if any of the three keys
    /// is missing or the filter type is unknown.
    pub fn from_args(args: &HashMap<String, String>) -> Result<Option<Self>, ResourceError> {
        if args.is_empty() {
            return Ok(None);
        }
        let filter_type = required_arg(args, "filter_type")?.parse()?;
        let field = required_arg(args, "filter_field")?;
        let value = required_arg(args, "filter_value")?;
        Ok(Some(Self::new(filter_type, field, value)))
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderDirection {
    /// Ascending.
    Asc,
    /// Descending.
    Desc,
}

impl OrderDirection {
    /// Returns the wire name of the direction.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl FromStr for OrderDirection {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(ResourceError::invalid_argument(
                "order_direction",
                format!("must be 'asc' or 'desc', got '{other}'"),
            )),
        }
    }
}

/// A sort order on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    /// The field to sort on.
    pub field: String,
    /// The sort direction.
    pub direction: OrderDirection,
}

impl Order {
    /// Creates an order.
    #[must_use]
    pub fn new(field: impl Into<String>, direction: OrderDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// Builds an order from `order_field`/`order_direction` arguments.
    ///
    /// Empty arguments mean no order.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] if a key is missing or the
    /// direction is neither `asc` nor `desc`.
    pub fn from_args(args: &HashMap<String, String>) -> Result<Option<Self>, ResourceError> {
        if args.is_empty() {
            return Ok(None);
        }
        let field = required_arg(args, "order_field")?;
        let direction = required_arg(args, "order_direction")?.parse()?;
        Ok(Some(Self::new(field, direction)))
    }
}

fn required_arg<'a>(
    args: &'a HashMap<String, String>,
    key: &'static str,
) -> Result<&'a str, ResourceError> {
    args.get(key)
        .map(String::as_str)
        .ok_or_else(|| ResourceError::invalid_argument(key, "is required"))
}

/// The parameters of a query, without its cached state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    /// The active filter, if any.
    pub filter: Option<Filter>,
    /// The active order, if any.
    pub order: Option<Order>,
    /// Objects per page; never zero.
    pub page_size: u32,
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            filter: None,
            order: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl QueryParams {
    /// Builds the list request parameters for one page.
    #[must_use]
    pub fn to_query_args(&self, page: u32, page_size: u32) -> HashMap<String, String> {
        let mut args = HashMap::new();
        args.insert("page".to_string(), page.to_string());
        args.insert("page_size".to_string(), page_size.to_string());
        if let Some(filter) = &self.filter {
            args.insert("filter_type".to_string(), filter.filter_type.as_str().to_string());
            args.insert("filter_field".to_string(), filter.field.clone());
            args.insert("filter_value".to_string(), filter.value.clone());
        }
        if let Some(order) = &self.order {
            args.insert("order_field".to_string(), order.field.clone());
            args.insert("order_direction".to_string(), order.direction.as_str().to_string());
        }
        args
    }
}

/// A query over the members of one collection.
///
/// Setters return `&mut Self` so they can be chained. Reading
/// [`count`](Self::count) or [`total_pages`](Self::total_pages) may make a
/// request; the count is cached until the filter changes, and every page
/// fetch refreshes it from the response.
pub struct Query<T = RemoteObject> {
    client: Arc<HttpClient>,
    object_type: ObjectType,
    params: QueryParams,
    count_cached: Option<u64>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            object_type: self.object_type,
            params: self.params.clone(),
            count_cached: self.count_cached,
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("object_type", &self.object_type)
            .field("params", &self.params)
            .field("count_cached", &self.count_cached)
            .finish_non_exhaustive()
    }
}

impl<T: FromRemoteObject> Query<T> {
    /// Creates an unfiltered query over `object_type` members.
    #[must_use]
    pub fn new(client: Arc<HttpClient>, object_type: ObjectType) -> Self {
        Self {
            client,
            object_type,
            params: QueryParams::default(),
            count_cached: None,
            _marker: PhantomData,
        }
    }

    /// Returns the current parameters.
    #[must_use]
    pub const fn params(&self) -> &QueryParams {
        &self.params
    }

    /// Returns the active filter.
    #[must_use]
    pub const fn filter(&self) -> Option<&Filter> {
        self.params.filter.as_ref()
    }

    /// Returns the active order.
    #[must_use]
    pub const fn order(&self) -> Option<&Order> {
        self.params.order.as_ref()
    }

    /// Returns the page size.
    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.params.page_size
    }

    /// Returns the cached count without making a request.
    #[must_use]
    pub const fn cached_count(&self) -> Option<u64> {
        self.count_cached
    }

    /// Sets the number of objects per page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] for a page size of zero.
    pub fn set_page_size(&mut self, page_size: u32) -> Result<&mut Self, ResourceError> {
        if page_size == 0 {
            return Err(ResourceError::invalid_argument(
                "page_size",
                "must be at least 1",
            ));
        }
        self.params.page_size = page_size;
        Ok(self)
    }

    /// Replaces the filter. `None` removes it.
    ///
    /// The cached count is dropped if the filter actually changed.
    pub fn set_filter(&mut self, filter: Option<Filter>) -> &mut Self {
        if self.params.filter != filter {
            self.params.filter = filter;
            self.count_cached = None;
        }
        self
    }

    /// Replaces the filter from `filter_type`/`filter_field`/`filter_value`
    /// arguments. Empty arguments remove the filter.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] for an incomplete or
    /// unknown filter; the query is left unchanged.
    pub fn set_filter_args(
        &mut self,
        args: &HashMap<String, String>,
    ) -> Result<&mut Self, ResourceError> {
        let filter = Filter::from_args(args)?;
        Ok(self.set_filter(filter))
    }

    /// Sets a filter if all three parts are given, and removes the filter
    /// otherwise.
    pub fn make_filter(
        &mut self,
        filter_type: Option<FilterType>,
        field: Option<&str>,
        value: Option<&str>,
    ) -> &mut Self {
        let filter = match (filter_type, field, value) {
            (Some(filter_type), Some(field), Some(value)) => {
                Some(Filter::new(filter_type, field, value))
            }
            _ => None,
        };
        self.set_filter(filter)
    }

    /// Filters on exact matches of a field.
    pub fn filter_field(&mut self, field: &str, value: &str) -> &mut Self {
        self.make_filter(Some(FilterType::Field), Some(field), Some(value))
    }

    /// Filters on prefix matches of a field.
    pub fn filter_prefix(&mut self, field: &str, value: &str) -> &mut Self {
        self.make_filter(Some(FilterType::FieldPrefix), Some(field), Some(value))
    }

    /// Filters on substring matches of a field.
    pub fn filter_search(&mut self, field: &str, value: &str) -> &mut Self {
        self.make_filter(Some(FilterType::FieldSearch), Some(field), Some(value))
    }

    /// Filters with a special query of the object type.
    pub fn filter_special(&mut self, query: &str, value: &str) -> &mut Self {
        self.make_filter(Some(FilterType::Special), Some(query), Some(value))
    }

    /// Filters by a full data search. What is searched depends on the
    /// object type.
    pub fn search(&mut self, terms: &str) -> &mut Self {
        self.filter_special("search", terms)
    }

    /// Removes the filter.
    pub fn remove_filter(&mut self) -> &mut Self {
        self.set_filter(None)
    }

    /// Replaces the order. `None` removes it.
    pub fn set_order(&mut self, order: Option<Order>) -> &mut Self {
        self.params.order = order;
        self
    }

    /// Replaces the order from `order_field`/`order_direction` arguments.
    /// Empty arguments remove the order.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] for an incomplete
    /// order or a direction other than `asc`/`desc`.
    pub fn set_order_args(
        &mut self,
        args: &HashMap<String, String>,
    ) -> Result<&mut Self, ResourceError> {
        let order = Order::from_args(args)?;
        Ok(self.set_order(order))
    }

    /// Orders by one field.
    pub fn order_by(&mut self, field: &str, direction: OrderDirection) -> &mut Self {
        self.set_order(Some(Order::new(field, direction)))
    }

    /// Returns the total number of matching objects.
    ///
    /// The first call (and the first after a filter change) requests a
    /// single-object page to learn the count.
    ///
    /// # Errors
    ///
    /// Returns the error of the request, if one was needed.
    pub async fn count(&mut self) -> Result<u64, ResourceError> {
        if let Some(count) = self.count_cached {
            return Ok(count);
        }
        self.fetch(1, 1).await?;
        self.count_cached.ok_or_else(|| {
            ResourceError::InvalidResponse("list response carried no total count".to_string())
        })
    }

    /// Returns the number of pages needed for all matches at the current
    /// page size.
    ///
    /// # Errors
    ///
    /// See [`count`](Self::count).
    pub async fn total_pages(&mut self) -> Result<u64, ResourceError> {
        let count = self.count().await?;
        Ok(count.div_ceil(u64::from(self.params.page_size)))
    }

    /// Fetches the objects on a one-based page.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::InvalidArgument`] for page zero, and
    /// [`ResourceError::InvalidResponse`] if the response is not a list with
    /// a total count.
    pub async fn get_page(&mut self, page: u32) -> Result<Vec<T>, ResourceError> {
        if page == 0 {
            return Err(ResourceError::invalid_argument("page", "pages are numbered from 1"));
        }
        let envelope = self.fetch(page, self.params.page_size).await?;
        let Value::Array(items) = envelope.data else {
            return Err(ResourceError::InvalidResponse(format!(
                "expected a list of {} objects",
                self.object_type.url_name
            )));
        };
        items
            .into_iter()
            .map(|data| {
                RemoteObject::from_snapshot(Arc::clone(&self.client), self.object_type, data)
                    .map(T::from_remote_object)
            })
            .collect()
    }

    /// Returns an iterator over every match on every page.
    ///
    /// The iterator works on a copy of the query, so changing this query
    /// afterwards does not affect it.
    #[must_use]
    pub fn iter_all(&self) -> QueryIter<T> {
        QueryIter {
            query: self.clone(),
            next_page: 1,
            total_pages: None,
            buffer: VecDeque::new(),
            done: false,
        }
    }

    async fn fetch(&mut self, page: u32, page_size: u32) -> Result<ResponseEnvelope, ResourceError> {
        let args = self.params.to_query_args(page, page_size);
        tracing::debug!(
            object_type = self.object_type.url_name,
            page,
            page_size,
            "Fetching page"
        );
        let envelope = self.client.get(self.object_type.url_name, Some(args)).await?;
        let total = envelope.total_count().ok_or_else(|| {
            ResourceError::InvalidResponse("list response carried no total count".to_string())
        })?;
        self.count_cached = Some(total);
        Ok(envelope)
    }
}

/// Iterator over all matches of a query, page by page.
///
/// Created by [`Query::iter_all`]. The number of pages is determined once,
/// before the first page is fetched. Iteration stops after the first error.
pub struct QueryIter<T = RemoteObject> {
    query: Query<T>,
    next_page: u32,
    total_pages: Option<u64>,
    buffer: VecDeque<T>,
    done: bool,
}

impl<T> fmt::Debug for QueryIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryIter")
            .field("query", &self.query)
            .field("next_page", &self.next_page)
            .field("total_pages", &self.total_pages)
            .field("buffered", &self.buffer.len())
            .finish_non_exhaustive()
    }
}

impl<T: FromRemoteObject> QueryIter<T> {
    /// Returns the next object, fetching the next page when needed.
    ///
    /// Returns `None` once every page has been read or after an error was
    /// returned.
    pub async fn next(&mut self) -> Option<Result<T, ResourceError>> {
        loop {
            if let Some(object) = self.buffer.pop_front() {
                return Some(Ok(object));
            }
            if self.done {
                return None;
            }
            let total_pages = match self.total_pages {
                Some(total_pages) => total_pages,
                None => match self.query.total_pages().await {
                    Ok(total_pages) => *self.total_pages.insert(total_pages),
                    Err(e) => return self.fail(e),
                },
            };
            if u64::from(self.next_page) > total_pages {
                self.done = true;
                return None;
            }
            match self.query.get_page(self.next_page).await {
                Ok(page) => {
                    self.next_page += 1;
                    self.buffer.extend(page);
                }
                Err(e) => return self.fail(e),
            }
        }
    }

    /// Reads all remaining objects.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    pub async fn try_collect(mut self) -> Result<Vec<T>, ResourceError> {
        let mut objects = Vec::new();
        while let Some(object) = self.next().await {
            objects.push(object?);
        }
        Ok(objects)
    }

    fn fail(&mut self, error: ResourceError) -> Option<Result<T, ResourceError>> {
        self.done = true;
        self.buffer.clear();
        Some(Err(error))
    }
}
