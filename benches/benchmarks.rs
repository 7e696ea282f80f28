// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use modbadge::{ModuleGroups, colour_for, latest_version, module_prefixes};

fn benchmark_latest_version(c: &mut Criterion,)
{
    let tags: Vec<String,> = (0..200)
        .map(|index| format!("services/api/v{}.{}.{}", index % 7, index % 13, index),)
        .collect();

    c.bench_function("latest_version_200_tags", |b| {
        b.iter(|| latest_version(black_box(&tags,).iter().map(String::as_str,),).expect("valid tags",),)
    },);
}

fn benchmark_colour_for(c: &mut Criterion,)
{
    c.bench_function("colour_for_module_path", |b| {
        b.iter(|| colour_for(black_box("github.com/example/monorepo/services/api",),),)
    },);
}

fn benchmark_group_and_resolve(c: &mut Criterion,)
{
    let mut listing = String::new();
    for module in 0..50 {
        for patch in 0..20 {
            listing.push_str(&format!("mod{module}/v1.0.{patch}\n"),);
        }
    }

    c.bench_function("group_and_resolve_50_modules", |b| {
        b.iter(|| {
            let groups = ModuleGroups::from_listing(black_box(&listing,),);
            for module in 0..50 {
                black_box(groups.latest(&format!("mod{module}"),).expect("known module",),);
            }
        },)
    },);
}

fn benchmark_readme_table(c: &mut Criterion,)
{
    let mut readme = String::from("# Modules\n\n| Module | Latest Tag |\n|---|---|\n",);
    for module in 0..100 {
        readme.push_str(&format!(
            "| mod{module} | <img src=\"https://github.com/o/r/releases/download/readmebadges/group__mod{module}.png\"> |\n"
        ),);
    }

    c.bench_function("readme_table_100_rows", |b| {
        b.iter(|| module_prefixes(black_box(&readme,), "readmebadges",).expect("valid table",),)
    },);
}

criterion_group!(
    benches,
    benchmark_latest_version,
    benchmark_colour_for,
    benchmark_group_and_resolve,
    benchmark_readme_table
);
criterion_main!(benches);
