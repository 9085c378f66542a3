// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use prometheus::{Encoder, Registry, TextEncoder};

/// A point-in-time copy of everything a [`Registry`] exposes, in text exposition form.
///
/// Reading the text format, rather than the collector objects, checks the same output a
/// scraper sees.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    text: String,
}

impl MetricsSnapshot {
    /// Gathers and encodes all metric families currently registered in `registry`.
    ///
    /// # Panics
    ///
    /// Panics if the registry contents cannot be encoded.
    #[must_use]
    pub fn capture(registry: &Registry) -> Self {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&registry.gather(), &mut buffer)
            .expect("metric families must encode as text");

        Self::from_text(String::from_utf8(buffer).expect("text exposition is UTF-8"))
    }

    /// Wraps an already encoded text exposition, such as a scraped `/metrics` body.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// The raw exposition text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Sums every sample named exactly `name` whose labels include all of `labels`.
    ///
    /// Returns zero when no sample matches.
    #[must_use]
    pub fn sum(&self, name: &str, labels: &[(&str, &str)]) -> f64 {
        self.samples()
            .filter(|sample| sample.name == name)
            .filter(|sample| labels.iter().all(|(k, v)| sample.labels.iter().any(|(sk, sv)| sk == k && sv == v)))
            .map(|sample| sample.value)
            .sum()
    }

    /// Returns whether a `# TYPE` line declares the family `name`.
    #[must_use]
    pub fn has_family(&self, name: &str) -> bool {
        self.text
            .lines()
            .filter_map(|line| line.strip_prefix("# TYPE "))
            .any(|rest| rest.split_whitespace().next() == Some(name))
    }

    fn samples(&self) -> impl Iterator<Item = Sample<'_>> {
        self.text
            .lines()
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(Sample::parse)
    }
}

struct Sample<'a> {
    name: &'a str,
    labels: Vec<(&'a str, &'a str)>,
    value: f64,
}

impl<'a> Sample<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let (series, value) = line.rsplit_once(' ')?;
        let value = value.parse().ok()?;

        let (name, labels) = match series.split_once('{') {
            Some((name, rest)) => (name, parse_labels(rest.strip_suffix('}')?)),
            None => (series, Vec::new()),
        };

        Some(Self { name, labels, value })
    }
}

fn parse_labels(labels: &str) -> Vec<(&str, &str)> {
    labels
        .split(',')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            Some((key.trim(), value.trim().trim_matches('"')))
        })
        .collect()
}
