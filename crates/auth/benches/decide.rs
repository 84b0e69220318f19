use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use cin_auth::{Gate, GateConfig, decide, decode};

/// Token for an administrator whose organization holds `privileges` approved privileges.
fn token_with_privileges(privileges: usize) -> String {
    let kinds = ["cin_administrators", "mission_partners", "reward_partners", "mobilizing_partners"];
    let privileges: Vec<serde_json::Value> = (0..privileges)
        .map(|i| serde_json::json!({"type": kinds[i % kinds.len()], "status": "approved"}))
        .collect();

    let payload = serde_json::json!({
        "sub": "bench-user",
        "active_organization_id": "O1",
        "roles": [{"role": "admin", "scope": "organization"}],
        "organizations": [{
            "organization_id": "O1",
            "organization_name": "Bench Org",
            "privileges": privileges
        }]
    });

    format!(
        "{}.{}.sig",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256"}"#),
        URL_SAFE_NO_PAD.encode(payload.to_string())
    )
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for privileges in [1usize, 4, 32].iter() {
        let token = token_with_privileges(*privileges);
        group.bench_with_input(BenchmarkId::new("privileges", privileges), &token, |b, token| {
            b.iter(|| decode(black_box(token)).unwrap());
        });
    }

    group.finish();
}

fn bench_decide(c: &mut Criterion) {
    let mut group = c.benchmark_group("decide");
    let claims = decode(&token_with_privileges(4)).unwrap();

    for path in ["/dashboard", "/create-missions", "/mission-approvals", "/sign-in"] {
        group.bench_with_input(BenchmarkId::new("path", path), &path, |b, path| {
            b.iter(|| decide(black_box(Some(&claims)), black_box(path)));
        });
    }

    group.bench_function("anonymous", |b| {
        b.iter(|| decide(black_box(None), black_box("/create-missions")));
    });

    group.finish();
}

fn bench_gate(c: &mut Criterion) {
    let gate = Gate::new(GateConfig::default());
    let token = token_with_privileges(4);

    c.bench_function("gate_handle_full_pipeline", |b| {
        b.iter(|| gate.handle(black_box(Some(token.as_str())), black_box("/create-missions")));
    });
}

criterion_group!(benches, bench_decode, bench_decide, bench_gate);
criterion_main!(benches);
