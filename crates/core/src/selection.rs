//! User close intent, held apart from the immutable classification.

use std::collections::BTreeSet;

use crate::reconcile::CloseRequest;
use crate::tab::{Classification, Tab};

/// Case-insensitive substring match against protection patterns.
pub fn is_protected(url: &str, protected_patterns: &[String]) -> bool {
	let url_lower = url.to_lowercase();
	protected_patterns
		.iter()
		.filter(|pattern| !pattern.is_empty())
		.any(|pattern| url_lower.contains(&pattern.to_lowercase()))
}

/// Ordinals of tabs the user wants closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
	ordinals: BTreeSet<usize>,
}

impl Selection {
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts from each tab's default `selected` flag.
	pub fn defaults(classification: &Classification) -> Self {
		let mut selection = Self::new();
		selection.select_where(classification, |tab| tab.selected);
		selection
	}

	pub fn select(&mut self, ordinal: usize) {
		self.ordinals.insert(ordinal);
	}

	pub fn deselect(&mut self, ordinal: usize) {
		self.ordinals.remove(&ordinal);
	}

	pub fn toggle(&mut self, ordinal: usize) {
		if !self.ordinals.remove(&ordinal) {
			self.ordinals.insert(ordinal);
		}
	}

	pub fn contains(&self, ordinal: usize) -> bool {
		self.ordinals.contains(&ordinal)
	}

	pub fn select_where(&mut self, classification: &Classification, predicate: impl Fn(&Tab) -> bool) {
		for (ordinal, tab) in classification.tabs().iter().enumerate() {
			if predicate(tab) {
				self.ordinals.insert(ordinal);
			}
		}
	}

	pub fn deselect_where(&mut self, classification: &Classification, predicate: impl Fn(&Tab) -> bool) -> usize {
		let before = self.ordinals.len();
		self.ordinals
			.retain(|&ordinal| classification.get(ordinal).is_none_or(|tab| !predicate(tab)));
		before - self.ordinals.len()
	}

	/// Drops protected tabs; returns how many were dropped.
	pub fn exclude_protected(&mut self, classification: &Classification, protected_patterns: &[String]) -> usize {
		self.deselect_where(classification, |tab| is_protected(&tab.url, protected_patterns))
	}

	pub fn len(&self) -> usize {
		self.ordinals.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ordinals.is_empty()
	}

	pub fn ordinals(&self) -> impl Iterator<Item = usize> + '_ {
		self.ordinals.iter().copied()
	}

	/// Selected tabs in list order; ordinals outside the list are skipped.
	pub fn tabs<'a>(&'a self, classification: &'a Classification) -> impl Iterator<Item = &'a Tab> + 'a {
		self.ordinals.iter().filter_map(|&ordinal| classification.get(ordinal))
	}

	/// URL-identified request for the reconciler.
	pub fn to_request(&self, classification: &Classification) -> CloseRequest {
		CloseRequest {
			urls: self.tabs(classification).map(|tab| tab.url.clone()).collect(),
			emptied_windows: classification.emptied_windows().to_vec(),
		}
	}
}
