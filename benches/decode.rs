use criterion::{black_box, criterion_group, criterion_main, Criterion};
use metar_decoder::{decode_input, decode_report, decode_weather_tokens};

const RAW: &str = "METAR KRDU 211251Z AUTO 19012G18KT 180V240 1 1/2SM -TSRA BR FEW012 BKN025 OVC040 M05/M10 A2969 RMK AO2 SLP057";

const JSON: &str = r#"[
  {"rawOb": "KRDU 211251Z 19012G18KT 10SM -RA BKN025 22/18 A2969", "icaoId": "KRDU",
   "obsTime": 1750510260, "wdir": 190, "wspd": 12, "wgst": 18, "visib": "10+",
   "altim": 1005.4, "temp": 22, "dewp": 18, "wxString": "-RA",
   "clouds": [{"cover": "BKN", "base": 2500}]},
  {"rawOb": "KTYS 211253Z VRB03KT 6SM HZ SCT050 24/19 A3001", "icaoId": "KTYS",
   "obsTime": "2025-06-21T12:53:00Z", "wdir": "VRB", "wspd": 3, "visib": 6,
   "temp": 24, "dewp": 19, "wxString": "HZ", "clouds": [{"cover": "SCT", "base": 5000}]}
]"#;

fn bench_decode(c: &mut Criterion) {
    c.bench_function("decode_report", |b| b.iter(|| decode_report(black_box(RAW))));
    c.bench_function("decode_weather_tokens", |b| {
        b.iter(|| decode_weather_tokens(black_box("+TSRAGR VCSH -FZDZ BLSN")))
    });
    c.bench_function("decode_input_json", |b| b.iter(|| decode_input(black_box(JSON))));
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
