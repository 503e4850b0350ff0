//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `paperdesk_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use paperdesk_core::Project;

fn main() {
    let project = Project::create_default("Smoke Desk");
    println!("paperdesk_core version={}", paperdesk_core::core_version());
    println!(
        "seed project folders={} stack={} integrity={}",
        project.left_desk.folders.len() + project.right_desk.folders.len(),
        project.main_stack.len(),
        project.verify_integrity().is_ok()
    );
}
