//! Inspection commands (`resolve`, `expand`, `list`, `archive`).

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, anyhow, bail};

use super::{ArchiveArgs, ListArgs};
use crate::config::SiteConfig;
use crate::core::Request;
use crate::model::{ContentStore, Order};
use crate::modules::archive::PeriodDefault;
use crate::modules::{FeaturedFilter, HookRegistry, NewsArchiveModule, NewsListModule};
use crate::resolver::UrlResolver;
use crate::tags::expand_insert_tags;
use crate::utils::date::DateTimeUtc;

/// `resolve`: print an item's canonical URL.
pub fn run_resolve(
    store: &ContentStore,
    config: &SiteConfig,
    item: &str,
    absolute: bool,
    month: Option<&str>,
) -> Result<()> {
    let Some(item) = store.item_by_id_or_alias(item) else {
        bail!("no news item named {item:?}");
    };

    let mut request = Request::new("/");
    if let Some(month) = month {
        request = request.with_param("month", month);
    }

    let resolver = UrlResolver::new(store, config);
    println!(
        "{}",
        resolver.resolve(item, absolute, month.is_some(), &request)
    );
    Ok(())
}

/// `expand`: expand insert tags in a file or stdin.
pub fn run_expand(store: &ContentStore, config: &SiteConfig, input: &Path) -> Result<()> {
    let text = if input == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?
    };

    let resolver = UrlResolver::new(store, config);
    let request = Request::new("/");
    print!(
        "{}",
        expand_insert_tags(&text, store, &resolver, config, &request)
    );
    Ok(())
}

/// `list`: run a news list module and print its output as JSON.
pub fn run_list(store: &ContentStore, config: &SiteConfig, args: &ListArgs) -> Result<()> {
    let module = NewsListModule {
        archives: args.archives.clone(),
        featured: parse_featured(&args.featured)?,
        order: parse_order(&args.order)?,
        max_items: args.limit,
        skip_first: args.skip,
        per_page: args.per_page,
        ..Default::default()
    };

    let mut request = Request::new("/news/");
    if let Some(page) = args.page {
        request = request.with_param(&format!("page_n{}", module.id), &page.to_string());
    }

    let resolver = UrlResolver::new(store, config);
    let hooks = HookRegistry::default();
    let output = module
        .compile(store, &resolver, &hooks, &request, DateTimeUtc::now())
        .map_err(|err| anyhow!("{err}"))?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// `archive`: run a news archive module and print its output as JSON.
pub fn run_archive(store: &ContentStore, config: &SiteConfig, args: &ArchiveArgs) -> Result<()> {
    let module = NewsArchiveModule {
        archives: args.archives.clone(),
        period_default: if args.all {
            PeriodDefault::AllItems
        } else {
            PeriodDefault::CurrentPeriod
        },
        per_page: args.per_page,
        ..Default::default()
    };

    let mut request = Request::new("/archive/");
    for (param, value) in [
        ("month", &args.month),
        ("year", &args.year),
        ("day", &args.day),
    ] {
        if let Some(value) = value {
            request = request.with_param(param, value);
        }
    }
    if let Some(page) = args.page {
        request = request.with_param(&format!("page_a{}", module.id), &page.to_string());
    }

    let resolver = UrlResolver::new(store, config);
    let hooks = HookRegistry::default();
    let output = module
        .compile(store, &resolver, &hooks, &request, DateTimeUtc::now())
        .map_err(|err| anyhow!("{err}"))?;

    match output {
        Some(output) => println!("{}", serde_json::to_string_pretty(&output)?),
        None => println!("null"),
    }
    Ok(())
}

fn parse_featured(raw: &str) -> Result<FeaturedFilter> {
    Ok(match raw {
        "all" => FeaturedFilter::All,
        "featured" => FeaturedFilter::Featured,
        "unfeatured" => FeaturedFilter::Unfeatured,
        _ => bail!("unknown featured filter {raw:?} (all | featured | unfeatured)"),
    })
}

fn parse_order(raw: &str) -> Result<Order> {
    Ok(match raw {
        "date_desc" => Order::DateDesc,
        "date_asc" => Order::DateAsc,
        "headline_asc" => Order::HeadlineAsc,
        "headline_desc" => Order::HeadlineDesc,
        "random" => Order::Random,
        _ => bail!("unknown sort order {raw:?}"),
    })
}
