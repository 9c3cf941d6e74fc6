//! Cache command - manage the lookup cache

use crate::cli::args::{CacheAction, CacheArgs};
use crate::config::Config;
use crate::error::RegistryResult;
use crate::registry::LookupCache;
use crate::ui::{self, UiContext};

/// Execute the cache command
pub async fn execute(args: CacheArgs, config: &Config) -> RegistryResult<()> {
    let cache = LookupCache::new(config.registry.lookup_cache_dir());

    match args.action {
        CacheAction::Path => {
            println!("{}", cache.dir().display());
            Ok(())
        }
        CacheAction::Clear { yes } => clear(&cache, yes).await,
    }
}

async fn clear(cache: &LookupCache, yes: bool) -> RegistryResult<()> {
    let ctx = UiContext::detect();

    if !yes {
        let prompt = format!("Delete cached lookups in {}?", cache.dir().display());
        if !ui::confirm(&ctx, &prompt, false).await? {
            ui::step_info("Nothing removed");
            return Ok(());
        }
    }

    let removed = cache.clear().await?;
    ui::step_ok(&format!("Removed {} cached lookup(s)", removed));
    Ok(())
}
