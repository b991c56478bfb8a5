use std::hint::black_box;
use bencher::{Header, SAMPLES, Sample, Shape};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use micro_headers::HeaderError;

fn parse(sample: &Sample) -> Result<usize, HeaderError> {
    let value = sample.value();
    let parsed = match sample.header() {
        Header::Accept => micro_headers::parse_accept(value)?.len(),
        Header::AcceptEncoding => micro_headers::parse_accept_encoding(value)?.len(),
        Header::AcceptLanguage => micro_headers::parse_accept_language(value)?.len(),
        Header::CacheControl => micro_headers::parse_cache_control(value)?.len(),
        Header::ContentDisposition => micro_headers::parse_content_disposition(value)?.parameters().len(),
        Header::ContentType => micro_headers::parse_content_type(value)?.parameters().len(),
        Header::Cookie => micro_headers::parse_cookie(value)?.len(),
        Header::SetCookie => micro_headers::parse_set_cookie(value)?.extensions().len(),
        Header::Link => micro_headers::parse_link(value)?.len(),
        Header::UserAgent => micro_headers::parse_product_tokens(value)?.len(),
    };
    Ok(parsed)
}

fn benchmark_shape(criterion: &mut Criterion, shape: Shape, group_name: &str) {
    let mut group = criterion.benchmark_group(group_name);

    for sample in SAMPLES.iter().filter(|sample| sample.shape() == shape) {
        group.throughput(Throughput::Bytes(sample.value().len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(sample.name()), sample, |b, sample| {
            b.iter(|| {
                let parsed = parse(black_box(sample)).expect("sample should be a valid header value");
                black_box(parsed);
            });
        });
    }

    group.finish();
}

fn benchmark_header_parser(criterion: &mut Criterion) {
    benchmark_shape(criterion, Shape::Token, "token_headers");
    benchmark_shape(criterion, Shape::Parameterized, "parameterized_headers");
    benchmark_shape(criterion, Shape::List, "list_headers");
}

fn benchmark_render(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("render");
    let sample = SAMPLES.iter().find(|sample| sample.header() == Header::Accept).expect("an accept sample should be present");
    let accept = micro_headers::Accept(micro_headers::parse_accept(sample.value()).expect("sample should be a valid accept header"));
    group.bench_function("accept_to_string", |b| b.iter(|| black_box(accept.to_string())));
    group.finish();
}

criterion_group!(parser, benchmark_header_parser, benchmark_render);
criterion_main!(parser);
