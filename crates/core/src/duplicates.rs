//! Exact and fuzzy duplicate detection.
//!
//! Each tab is compared against every earlier tab in enumeration order and
//! linked to the first one that matches, either by identical URL or by a
//! same-domain URL whose path is within [`SIMILARITY_THRESHOLD`]. Links never
//! chain: if A≈B and B≈C but A≉C, C points at B only.

use tracing::debug;

use crate::tab::Tab;

/// Path similarity a same-domain URL must exceed to count as a duplicate.
pub const SIMILARITY_THRESHOLD: f64 = 0.70;

const SCHEMES: [&str; 2] = ["https://", "http://"];

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
	let head = value.get(..prefix.len())?;
	if head.eq_ignore_ascii_case(prefix) {
		value.get(prefix.len()..)
	} else {
		None
	}
}

/// URL with the scheme and a leading `www.` removed.
fn host_and_rest(url: &str) -> &str {
	let rest = SCHEMES
		.iter()
		.find_map(|scheme| strip_prefix_ignore_case(url, scheme))
		.unwrap_or(url);
	strip_prefix_ignore_case(rest, "www.").unwrap_or(rest)
}

/// Lower-cased host part: scheme and `www.` stripped, cut at the first `/`.
pub fn normalize_domain(url: &str) -> String {
	let rest = host_and_rest(url);
	let host = rest.split('/').next().unwrap_or(rest);
	host.to_lowercase()
}

/// Everything after the host's first `/`, query included, minus one trailing `/`.
pub fn normalize_path(url: &str) -> String {
	let Some((_, path)) = host_and_rest(url).split_once('/') else {
		return String::new();
	};
	path.strip_suffix('/').unwrap_or(path).to_string()
}

/// Levenshtein distance over chars with unit costs.
pub fn edit_distance(a: &str, b: &str) -> usize {
	let a: Vec<char> = a.chars().collect();
	let b: Vec<char> = b.chars().collect();
	let (m, n) = (a.len(), b.len());

	if m == 0 {
		return n;
	}
	if n == 0 {
		return m;
	}

	let mut prev: Vec<usize> = (0..=n).collect();
	let mut curr = vec![0; n + 1];

	for i in 1..=m {
		curr[0] = i;
		for j in 1..=n {
			let cost = usize::from(a[i - 1] != b[j - 1]);
			curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
		}
		std::mem::swap(&mut prev, &mut curr);
	}

	prev[n]
}

/// Similarity of two normalized paths in `[0, 1]`, compared case-insensitively.
///
/// Equal paths score 1; otherwise an empty path on either side scores 0.
pub fn path_similarity(a: &str, b: &str) -> f64 {
	let a = a.to_lowercase();
	let b = b.to_lowercase();
	if a == b {
		return 1.0;
	}

	let longest = a.chars().count().max(b.chars().count());
	if a.is_empty() || b.is_empty() {
		return 0.0;
	}

	1.0 - edit_distance(&a, &b) as f64 / longest as f64
}

/// Same normalized domain and path similarity above [`SIMILARITY_THRESHOLD`].
pub fn are_similar_urls(a: &str, b: &str) -> bool {
	NormalizedUrl::new(a).is_similar(&NormalizedUrl::new(b))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct NormalizedUrl {
	domain: String,
	path: String,
}

impl NormalizedUrl {
	fn new(url: &str) -> Self {
		Self {
			domain: normalize_domain(url),
			path: normalize_path(url),
		}
	}

	fn is_similar(&self, other: &Self) -> bool {
		self.domain == other.domain && path_similarity(&self.path, &other.path) > SIMILARITY_THRESHOLD
	}
}

/// Links every tab to the first earlier tab it duplicates.
///
/// Previous annotations are discarded, so running this twice gives the same
/// result. Duplicates are selected by default, everything else is not.
pub fn mark_duplicates(mut tabs: Vec<Tab>) -> Vec<Tab> {
	let normalized: Vec<NormalizedUrl> = tabs.iter().map(|tab| NormalizedUrl::new(&tab.url)).collect();

	let links: Vec<Option<usize>> = (0..tabs.len())
		.map(|i| (0..i).find(|&j| tabs[i].url == tabs[j].url || normalized[i].is_similar(&normalized[j])))
		.collect();

	for (tab, link) in tabs.iter_mut().zip(links) {
		tab.duplicate_of = link;
		tab.selected = link.is_some();
	}

	debug!(
		target = "tabsweep.duplicates",
		tabs = tabs.len(),
		duplicates = tabs.iter().filter(|tab| tab.is_duplicate()).count(),
		"marked duplicates"
	);

	tabs
}
