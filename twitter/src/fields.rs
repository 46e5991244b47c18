/// Which objects and fields the API should return for a request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fields {
    pub user: Vec<&'static str>,
    pub tweet: Vec<&'static str>,
    pub media: Vec<&'static str>,
    pub place: Vec<&'static str>,
    pub expansions: Vec<&'static str>,
    /// Page size hint for paged endpoints
    pub max_results: Option<u32>,
}

impl Fields {
    /// Render as query parameters, skipping empty lists.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&'static str, String)> = [
            ("user.fields", &self.user),
            ("tweet.fields", &self.tweet),
            ("media.fields", &self.media),
            ("place.fields", &self.place),
            ("expansions", &self.expansions),
        ]
        .into_iter()
        .filter(|(_, values)| !values.is_empty())
        .map(|(name, values)| (name, values.join(",")))
        .collect();

        if let Some(max_results) = self.max_results {
            query.push(("max_results", max_results.to_string()));
        }

        query
    }

    pub fn expands(&self, expansion: &str) -> bool {
        self.expansions.contains(&expansion)
    }
}
