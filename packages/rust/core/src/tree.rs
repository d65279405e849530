//! Category tree construction.
//!
//! Groups resolved builders into a hierarchical namespace by their
//! category-path segments. Built single-threaded before any concurrent
//! phase; the catalog assembler imposes all consumer-visible ordering
//! afterwards.

use std::collections::BTreeMap;

use tracing::debug;

use datacat_shared::{BuilderRef, DatacatError, Result};

/// A node in the category namespace: either nested subcategories or a
/// terminal list of builders.
///
/// Invariant: every included builder appears in exactly one leaf,
/// reached by its full category path.
#[derive(Debug, Clone)]
pub enum CategoryNode {
    /// Subcategories keyed by path segment.
    Category(BTreeMap<String, CategoryNode>),
    /// Builders whose category path ends at this node.
    Leaf(Vec<BuilderRef>),
}

impl CategoryNode {
    /// Collect every builder in this subtree. No ordering guarantee
    /// beyond segment order; callers sort by name.
    pub fn flatten(&self) -> Vec<BuilderRef> {
        match self {
            Self::Leaf(builders) => builders.clone(),
            Self::Category(children) => {
                children.values().flat_map(|child| child.flatten()).collect()
            }
        }
    }
}

/// Build the category tree from resolved builders.
///
/// Each builder's category path is split into segments and inserted by
/// explicit descent. Builders whose path contains `testing_marker`
/// anywhere are non-public and never documented. Returns the top-level
/// children; their keys become the catalog's section labels.
pub fn build_tree(
    builders: Vec<BuilderRef>,
    testing_marker: &str,
) -> Result<BTreeMap<String, CategoryNode>> {
    let mut root = BTreeMap::new();

    for builder in builders {
        if builder.category.iter().any(|seg| seg == testing_marker) {
            debug!(name = %builder.name, "skipping non-public builder");
            continue;
        }
        let segments = builder.category.clone();
        insert(&mut root, &segments, builder)?;
    }

    Ok(root)
}

/// Section label for a top-level segment: first letter upper-cased.
pub fn section_label(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(c) => {
            let upper: String = c.to_uppercase().collect();
            format!("{upper}{}", chars.as_str())
        }
        None => String::new(),
    }
}

fn insert(
    children: &mut BTreeMap<String, CategoryNode>,
    segments: &[String],
    builder: BuilderRef,
) -> Result<()> {
    match segments {
        [] => Err(conflict(&builder)),
        [last] => {
            match children
                .entry(last.clone())
                .or_insert_with(|| CategoryNode::Leaf(Vec::new()))
            {
                CategoryNode::Leaf(builders) => {
                    builders.push(builder);
                    Ok(())
                }
                CategoryNode::Category(_) => Err(conflict(&builder)),
            }
        }
        [head, rest @ ..] => {
            match children
                .entry(head.clone())
                .or_insert_with(|| CategoryNode::Category(BTreeMap::new()))
            {
                CategoryNode::Category(sub) => insert(sub, rest, builder),
                CategoryNode::Leaf(_) => Err(conflict(&builder)),
            }
        }
    }
}

fn conflict(builder: &BuilderRef) -> DatacatError {
    DatacatError::CategoryConflict {
        name: builder.name.clone(),
        path: builder.category.join("/"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
