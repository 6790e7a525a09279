use serde_json::Value;

use crate::errors::ExplorerError;
use crate::explorer::{BlockRange, ExplorerClient, Page, QueryParams};

/// How two topic filters combine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopicOperator {
    And,
    Or,
}

impl TopicOperator {
    /// Wire value
    pub fn as_str(&self) -> &'static str {
        match self {
            TopicOperator::And => "and",
            TopicOperator::Or => "or",
        }
    }
}

/// Filter for `getLogs`
///
/// Topics are addressed by position (0-3). When two topics are set the
/// explorer needs an operator between them; see [`LogQuery::operator`].
///
/// ```rust
/// use chaingate::explorer::{BlockRange, LogQuery, TopicOperator};
///
/// let query = LogQuery::new(BlockRange::new(15_073_139, 15_074_139))
///     .address("0x59728544b08ab483533076417fbbb2fd0b17ce3a")
///     .topic(0, "0x27c4f0403323142b599832f26acd21c74a9e5b809f2215726e244a4ac588cd7d")
///     .topic(1, "0x00000000000000000000000023581767a106ae21c074b2276d25e5c3e136a68b")
///     .operator(0, 1, TopicOperator::And);
/// # let _ = query;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    range: BlockRange,
    address: Option<String>,
    topics: [Option<String>; 4],
    operators: Vec<(u8, u8, TopicOperator)>,
    page: Option<Page>,
}

impl LogQuery {
    /// Logs within `range`
    pub fn new(range: BlockRange) -> Self {
        Self {
            range,
            ..Self::default()
        }
    }

    /// Restricts to logs emitted by `address`.
    #[must_use]
    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets topic `index`; indices above 3 are ignored.
    #[must_use]
    pub fn topic(mut self, index: usize, topic: impl Into<String>) -> Self {
        if let Some(slot) = self.topics.get_mut(index) {
            *slot = Some(topic.into());
        }
        self
    }

    /// Sets the operator between topics `a` and `b`, in either order.
    #[must_use]
    pub fn operator(mut self, a: u8, b: u8, operator: TopicOperator) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        self.operators.retain(|(l, h, _)| (*l, *h) != (low, high));
        self.operators.push((low, high, operator));
        self
    }

    /// Requests a specific page.
    #[must_use]
    pub fn page(mut self, page: Page) -> Self {
        self.page = Some(page);
        self
    }

    fn params(&self) -> QueryParams {
        let mut params = QueryParams::new()
            .with("fromBlock", self.range.start)
            .with("toBlock", self.range.end)
            .with_opt("address", self.address.as_deref())
            .with_opt("page", self.page.map(|p| p.page))
            .with_opt("offset", self.page.map(|p| p.offset));

        for (index, topic) in self.topics.iter().enumerate() {
            if let Some(topic) = topic {
                params.insert(format!("topic{index}"), topic.as_str());
            }
        }
        // Pairs outside 0..=3 or with low == high are dropped by the allow-list
        for (low, high, operator) in &self.operators {
            params.insert(format!("topic{low}_{high}_opr"), operator.as_str());
        }
        params
    }
}

/// `module=logs` endpoints
#[derive(Debug, Clone, Copy)]
pub struct Logs<'a> {
    client: &'a ExplorerClient,
}

impl<'a> Logs<'a> {
    pub(crate) fn new(client: &'a ExplorerClient) -> Self {
        Self { client }
    }

    /// Event logs matching `query`.
    pub async fn get_logs(&self, query: &LogQuery) -> Result<Value, ExplorerError> {
        self.client.request("logs", "getLogs", query.params()).await
    }

    /// Every log emitted by `address` within `range`.
    pub async fn by_address(
        &self,
        address: &str,
        range: BlockRange,
        page: Page,
    ) -> Result<Value, ExplorerError> {
        let query = LogQuery::new(range).address(address).page(page);
        self.get_logs(&query).await
    }
}
