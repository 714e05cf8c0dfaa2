//! Terminal output
//!
//! Formats jobs, the manifest and navigation models for the console.

use colored::*;
use encore_core::domain::job::{JobStatus, MetricJob};
use encore_core::domain::manifest::JobManifest;
use encore_core::domain::nav::ArtistNav;

/// Print the job list with status and last run
pub fn print_jobs(jobs: &[MetricJob]) {
    println!("{}", "Metrics jobs".bold());
    for job in jobs {
        print_job(job);
    }
    println!();
}

fn print_job(job: &MetricJob) {
    println!(
        "  {} {:<20} {:<12} {}",
        status_icon(job.status),
        job.name.bold(),
        colorize_status(job.status),
        format!("Last run: {}", job.last_run).dimmed()
    );
}

/// Print the job manifest
pub fn print_manifest(manifest: &JobManifest) {
    let specs = manifest.specs();
    println!("{}", format!("{} job(s):", specs.len()).bold());
    println!();
    for spec in specs {
        println!("  {} {}", "▸".cyan(), spec.id.bold());
        println!("    Name:      {}", spec.name);
        println!("    Icon:      {}", spec.icon.dimmed());
        println!("    Endpoint:  {}", spec.endpoint);
        println!();
    }
}

/// Print an artist navigation model
pub fn print_nav(nav: &ArtistNav) {
    println!(
        "{} {}",
        format!("[{}]", nav.initial).cyan(),
        nav.display_name.bold()
    );
    println!("  Avatar: {}", nav.avatar_url.dimmed());
    println!();
    for item in &nav.items {
        if item.active {
            println!("  {} {:<10} {}", "●".green(), item.label.bold(), item.href);
        } else {
            println!("  {} {:<10} {}", "○".dimmed(), item.label, item.href.dimmed());
        }
    }
}

/// Colorize job status for display
pub fn colorize_status(status: JobStatus) -> ColoredString {
    let label = status.as_str();
    match status {
        JobStatus::Idle => label.normal(),
        JobStatus::Running => label.yellow(),
        JobStatus::Success => label.green(),
        JobStatus::Error => label.red(),
    }
}

fn status_icon(status: JobStatus) -> ColoredString {
    match status {
        JobStatus::Idle => "▶".normal(),
        JobStatus::Running => "⟳".yellow(),
        JobStatus::Success => "✓".green(),
        JobStatus::Error => "✗".red(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        colored::control::set_override(false);
        assert_eq!(colorize_status(JobStatus::Idle).to_string(), "idle");
        assert_eq!(colorize_status(JobStatus::Error).to_string(), "error");
        assert_eq!(status_icon(JobStatus::Success).to_string(), "✓");
    }
}
