use {
    clap::Parser,
    itertools::Itertools,
    strum::IntoEnumIterator,
    tabled::{Table, Tabled, settings::Style},
    top_down_screener::{
        Category, Cli, JsonPreferenceSource, PreferenceDomain, PreferenceStore,
    },
};

#[derive(Tabled)]
struct PreferenceRow {
    domain: PreferenceDomain,
    category: Category,
    loaded: bool,
    active: String,
}

#[derive(Tabled)]
struct ScoreRow {
    attribute: String,
    value: String,
    score: f64,
}

fn main() {
    let (global_level, my_code_level) = if cfg!(debug_assertions) {
        (log::LevelFilter::Warn, log::LevelFilter::Info)
    } else {
        (log::LevelFilter::Error, log::LevelFilter::Error)
    };

    let mut builder = env_logger::Builder::new();

    builder
        .filter(None, global_level)
        .filter(Some("top_down_screener"), my_code_level)
        .init();

    let args = Cli::parse();

    let mut store = PreferenceStore::new();
    let source = JsonPreferenceSource::new(&args.base_dir);
    store.load_all(&source);

    let prefs: Vec<PreferenceRow> = PreferenceDomain::iter()
        .cartesian_product(Category::iter())
        .map(|(domain, category)| {
            let active = match domain {
                PreferenceDomain::Calculation => store.calculation_preferences(category),
                PreferenceDomain::Column => store.column_preferences(category),
            };
            PreferenceRow {
                domain,
                category,
                loaded: store.is_loaded(domain, category),
                active: active.join(", "),
            }
        })
        .collect();

    println!("{}", Table::new(prefs).with(Style::rounded()));

    let table = store.score_table();
    let scores: Vec<ScoreRow> = table
        .attributes()
        .sorted()
        .flat_map(|attribute| {
            table
                .values_for(attribute)
                .sorted_by(|a, b| b.1.total_cmp(&a.1))
                .map(move |(value, score)| ScoreRow {
                    attribute: attribute.to_string(),
                    value: value.to_string(),
                    score,
                })
        })
        .collect();

    println!("{}", Table::new(scores).with(Style::rounded()));
}
