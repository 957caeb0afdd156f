use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stage_identity_rust::engine::run_pipeline;
use stage_identity_rust::extraction::{
    classify_type, detect_posters, normalize_duration, ClassifierSources, DurationInput,
    HtmlHeuristics,
};

const MOVIE_URL: &str = "https://www.stage.in/en/haryanvi/movie/kayantar-14145";

fn sample_page() -> String {
    let filler: String = (0..200)
        .map(|i| format!("<div class=\"rail\"><a href=\"/en/haryanvi/movie/title-{}\">Title {}</a></div>", i, i))
        .collect();

    format!(
        r#"<html><head>
<title>STAGE</title>
<meta property="og:title" content="Kayantar">
<meta property="og:description" content="A gripping Haryanvi drama about a family torn apart by a long-buried secret.">
<script type="application/ld+json">{{"@type":"Movie","name":"Kayantar","duration":"PT1H27M","uploadDate":"2023-04-14T00:00:00+05:30","genre":["Drama"],"inLanguage":"haryanvi"}}</script>
</head><body>
<h1>Kayantar</h1>
{}
<script id="__NEXT_DATA__" type="application/json">{{"props":{{"pageProps":{{"data":{{"type":"movie","title":"Kayantar","yearOfRelease":2023,"duration":5220,"dialect":"haryanvi","horizontalThumbnail":"https://media.stage.in/movie/horizontal/kayantar.jpg","verticalThumbnail":"https://media.stage.in/movie/vertical/kayantar.jpg"}}}}}}}}</script>
</body></html>"#,
        filler
    )
}

fn bench_pipeline(c: &mut Criterion) {
    let html = sample_page();
    let heuristics = HtmlHeuristics::default();

    c.bench_function("pipeline_movie_page", |b| {
        b.iter(|| black_box(run_pipeline(MOVIE_URL, black_box(&html), &heuristics)))
    });

    let without_markup = HtmlHeuristics {
        enabled: false,
        ..HtmlHeuristics::default()
    };
    c.bench_function("pipeline_structured_only", |b| {
        b.iter(|| black_box(run_pipeline(MOVIE_URL, black_box(&html), &without_markup)))
    });
}

fn bench_components(c: &mut Criterion) {
    c.bench_function("duration_normalization", |b| {
        b.iter(|| {
            black_box(normalize_duration(DurationInput::Iso(black_box("PT1H27M"))));
            black_box(normalize_duration(DurationInput::Seconds(black_box(5220))));
            black_box(normalize_duration(DurationInput::Text(black_box("1:27:00"))));
        })
    });

    let serialized = r#"{"banner":"https://media.stage.in/show/horizontal/chhal.jpg","cover":"https://media.stage.in/show/vertical/chhal.webp","episodes":[{"season":1}]}"#;
    c.bench_function("poster_detection", |b| {
        b.iter(|| black_box(detect_posters(black_box(serialized))))
    });

    c.bench_function("type_classification", |b| {
        b.iter(|| {
            black_box(classify_type(&ClassifierSources {
                page_url: black_box("https://www.stage.in/en/haryanvi/chhal-kapat-9001"),
                combined_text: black_box(serialized),
            }))
        })
    });
}

criterion_group!(benches, bench_pipeline, bench_components);
criterion_main!(benches);
