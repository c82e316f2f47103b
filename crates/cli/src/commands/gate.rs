//! Access gate command.
//!
//! Prints what the view at a path would do for the stored session:
//!
//! ```text
//! /novo-produto: render
//! /carrinho: render with chrome
//! /pedidos: redirect to /
//! /login: public
//! ```

use codeburger_admin::AdminConfig;
use codeburger_core::Decision;

/// Evaluate the gate for `path` and print the decision.
#[allow(clippy::print_stdout)]
pub fn check(config: &AdminConfig, path: &str) {
    let gate = super::gate(config);
    let verdict = match gate.check_path(path) {
        None => "public".to_string(),
        Some(Decision::Render) => "render".to_string(),
        Some(Decision::RenderWithChrome) => "render with chrome".to_string(),
        Some(Decision::RedirectTo(target)) => format!("redirect to {target}"),
    };
    println!("{path}: {verdict}");
}
