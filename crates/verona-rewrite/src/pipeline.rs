//! The pipeline facade: an ordered list of passes run over a tree, with a
//! configurable rewrite-fuel and max-depth budget, and a stop-after
//! inspection hook for dumping intermediate ASTs in tests and the CLI.
//!
//! Mirrors the teacher's staged `QueryBuilder -> QueryParsed -> QueryAnalyzed`
//! facade (`query/stages.rs`), collapsed to a single `Pipeline` type since
//! every stage here is the same shape (a pass over a `Node`) rather than
//! distinct parse/analyze/link phases.

use verona_core::Node;
use verona_diagnostics::Diagnostics;

use crate::error::Error;
use crate::pass::Pass;

const DEFAULT_REWRITE_FUEL: u32 = 1_000_000;
const DEFAULT_MAX_TREE_DEPTH: u32 = 512;

#[derive(Clone, Copy, Debug)]
pub struct PipelineConfig {
    pub rewrite_fuel: u32,
    pub max_tree_depth: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            rewrite_fuel: DEFAULT_REWRITE_FUEL,
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
        }
    }
}

pub struct PipelineBuilder {
    passes: Vec<Pass>,
    config: PipelineConfig,
}

impl PipelineBuilder {
    pub fn new(passes: Vec<Pass>) -> Self {
        Self {
            passes,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_rewrite_fuel(mut self, fuel: u32) -> Self {
        self.config.rewrite_fuel = fuel;
        self
    }

    pub fn with_max_tree_depth(mut self, depth: u32) -> Self {
        self.config.max_tree_depth = depth;
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            passes: self.passes,
            config: self.config,
        }
    }
}

/// An ordered sequence of passes, ready to run over a concrete tree.
pub struct Pipeline {
    passes: Vec<Pass>,
    config: PipelineConfig,
}

impl Pipeline {
    pub fn builder(passes: Vec<Pass>) -> PipelineBuilder {
        PipelineBuilder::new(passes)
    }

    pub fn passes(&self) -> &[Pass] {
        &self.passes
    }

    /// Runs every pass in order. If any pass's rules produce an `Error`
    /// node, diagnostics still accumulate but the pipeline does not run the
    /// *next* pass on an errored tree — per §4.1's "errors are collected;
    /// the pipeline continues so multiple diagnostics surface per run" at
    /// the rule level, paired with "the pipeline stops before the next pass
    /// if any Error nodes exist" at the pass-boundary level.
    pub fn run_all(&self, tree: Node) -> Result<(Node, Diagnostics), Error> {
        self.run_to(tree, self.passes.last().map(|p| p.name))
    }

    /// Runs passes in order up to and including the one named `stop_at`
    /// (or all of them, if `stop_at` is `None`), returning the tree as it
    /// stood after that pass. Used to dump intermediate representations in
    /// tests and by the CLI's `--pass=<name>` flag.
    pub fn run_to(&self, tree: Node, stop_at: Option<&'static str>) -> Result<(Node, Diagnostics), Error> {
        let mut diagnostics = Diagnostics::new();

        for pass in &self.passes {
            let pass_diagnostics = crate::engine::run_pass(
                pass,
                &tree,
                self.config.rewrite_fuel,
                self.config.max_tree_depth,
            )?;
            let had_errors = pass_diagnostics.has_errors() || tree_has_error_nodes(&tree);
            diagnostics.extend(pass_diagnostics);

            if Some(pass.name) == stop_at {
                break;
            }
            if had_errors {
                break;
            }
        }

        Ok((tree, diagnostics))
    }
}

fn tree_has_error_nodes(node: &Node) -> bool {
    node.token() == verona_core::Token::Error
        || node.children().iter().any(tree_has_error_nodes)
}
