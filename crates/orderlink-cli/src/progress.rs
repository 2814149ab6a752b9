use orderlink_sync::{LinkProgress, ProgressReporter, StageEvent};

/// Prints run milestones to stdout for interactive use.
pub struct StdoutProgress<'a> {
    link_field: &'a str,
}

impl<'a> StdoutProgress<'a> {
    pub fn new(link_field: &'a str) -> Self {
        Self { link_field }
    }
}

impl ProgressReporter for StdoutProgress<'_> {
    fn stage(&mut self, event: StageEvent) {
        match event {
            StageEvent::ClientsLoaded { count } => println!("Loaded {count} clients"),
            StageEvent::OrdersLoaded { count } => println!("Loaded {count} orders"),
            StageEvent::OrdersGrouped {
                unique_emails,
                without_email,
            } => {
                println!("Grouped orders into {unique_emails} unique emails");
                if without_email > 0 {
                    println!("Orders without email: {without_email}");
                }
            }
            StageEvent::LinkingStarted { clients, dry_run } => {
                println!("{}", linking_line(clients, dry_run, self.link_field));
            }
        }
    }

    fn linked(&mut self, progress: &LinkProgress<'_>) {
        println!("{}", progress_line(progress));
    }
}

fn linking_line(clients: usize, dry_run: bool, link_field: &str) -> String {
    if dry_run {
        format!("Matching {clients} clients via \"{link_field}\" (dry run, nothing will be linked)")
    } else {
        format!("Linking orders for {clients} clients via \"{link_field}\"")
    }
}

fn progress_line(progress: &LinkProgress<'_>) -> String {
    format!(
        "Updated {} clients ({}%): {} -> {} orders",
        progress.updated,
        progress.percent(),
        progress.email,
        progress.orders
    )
}
