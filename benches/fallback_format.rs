// SPDX-License-Identifier: MPL-2.0
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use std::sync::Arc;

use fluent_cascade::testing::MockFetcher;
use fluent_cascade::{BundleResolver, FluentMessageContext, Localization, NullReporter};
use unic_langid::LanguageIdentifier;

fn langids(tags: &[&str]) -> Vec<LanguageIdentifier> {
    tags.iter()
        .map(|t| t.parse().expect("valid language tag"))
        .collect()
}

fn fallback_format_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("fallback_format");

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("tokio runtime");

    let fetcher = Arc::new(MockFetcher::new(&[
        ("pl/app.ftl", "foo = Foo pl\n"),
        ("en-US/app.ftl", "foo = Foo en-US\nbar = Bar en-US\n"),
    ]));
    let resolver: BundleResolver<FluentMessageContext> = BundleResolver::new(
        langids(&["pl", "en-US"]),
        "en-US".parse().expect("valid language tag"),
        vec!["{locale}/app.ftl".to_string()],
        langids(&["pl"]),
        fetcher,
    );
    let l10n = Localization::new(resolver, FluentMessageContext::new).with_reporter(NullReporter);

    // Settle the interactive chain outside the measured loop.
    runtime
        .block_on(l10n.format_value("foo", None))
        .expect("warmup format");

    group.bench_function("head_hit", |b| {
        b.iter(|| {
            let value = runtime
                .block_on(l10n.format_value("foo", None))
                .expect("format");
            let _ = black_box(value);
        });
    });

    group.bench_function("one_fallback_step", |b| {
        b.iter(|| {
            let value = runtime
                .block_on(l10n.format_value("bar", None))
                .expect("format");
            let _ = black_box(value);
        });
    });

    group.finish();
}

criterion_group!(benches, fallback_format_benchmark);
criterion_main!(benches);
