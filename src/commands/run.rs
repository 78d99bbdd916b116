//! `snyk-task run` command.

use tracing::info;

use crate::context::ServiceContext;
use crate::pipeline::{run_step, Verdict};

/// Execute the step against `ctx` and return its verdict.
pub fn run(ctx: &ServiceContext, debug: bool) -> Verdict {
    info!(version = env!("CARGO_PKG_VERSION"), "snyk-task starting");
    let verdict = run_step(ctx, debug);
    info!(%verdict, "snyk-task finished");
    verdict
}

#[cfg(test)]
mod tests {
    use super::run;
    use crate::context::ServiceContext;
    use crate::pipeline::Verdict;
    use crate::ports::{Platform, TaskResult};
    use crate::testing::{NoFiles, ScriptedRunner, StubHost};

    #[test]
    fn run_reports_verdict_once() {
        let host = StubHost::new()
            .platform(Platform::MacOS)
            .tool("npm", "/usr/local/bin/npm")
            .tool("snyk", "/usr/local/bin/snyk")
            .token("tok")
            .input("monitorOnBuild", "false");
        let ctx = ServiceContext::new(host.clone(), ScriptedRunner::new(&[0, 0, 0]), NoFiles);

        assert_eq!(run(&ctx, false), Verdict::Succeeded);
        assert_eq!(host.results(), vec![(TaskResult::Succeeded, String::new())]);
    }
}
