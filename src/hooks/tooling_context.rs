use super::types::{ContextOutput, HookEvent, HookInput, HookOutput};
use crate::error::HookError;

/// Critical project reminders injected at session start.
pub const TOOLING_CONTEXT: &str = "
## Project Standards (ftry)

**Runtime**: Bun 1.2.19 exclusively (never npm/yarn/pnpm/node)
**Commands**: Use `nx` directly, not `bun nx` (Nx auto-detects bun)
**Development**: TDD approach - tests before implementation
**Commits**: Conventional format: `type(scope): subject`

**Quick Reference**:
- Dev servers: `nx serve [frontend|backend]`
- Quality gate: `bun run check-all` (before commits)
- Database: `bunx prisma [generate|migrate|studio]`

See CLAUDE.md for complete standards and workflows.
";

/// SessionStart handler: emit the tooling reminder as additional context,
/// hidden from the transcript. Other events produce nothing.
pub fn handle(input: &HookInput) -> Result<HookOutput, HookError> {
    if HookEvent::from_name(input.hook_event_name()) != Some(HookEvent::SessionStart) {
        return Ok(HookOutput::empty());
    }

    ContextOutput::new(HookEvent::SessionStart, TOOLING_CONTEXT.to_string(), true)
        .into_hook_output()
}
