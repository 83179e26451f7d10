use std::str::FromStr;
use crate::engine::search::SearchResponse;
use crate::error::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Text,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" | "txt" | "plain" => Ok(OutputFormat::Text),
            other => Err(Error::InvalidArgument(format!("unknown format '{}'", other))),
        }
    }
}

/// One line per product: `N. name (brand, category) - $price [score]`.
pub fn format_text(response: &SearchResponse) -> String {
    if response.results.is_empty() {
        return format!("No products found for \"{}\".\n", response.query);
    }

    let mut out = String::new();
    for (i, hit) in response.results.iter().enumerate() {
        let p = &hit.product;
        let facets: Vec<&str> = [p.brand.as_str(), p.category.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        let mut line = format!("{}. {}", i + 1, p.name);
        if !facets.is_empty() {
            line.push_str(&format!(" ({})", facets.join(", ")));
        }
        line.push_str(&format!(" - ${:.2} [{:.2}]\n", p.price, hit.score));
        out.push_str(&line);
    }
    out
}
