//! Unit tests for statistics rendering.

use hapctl_core::{ServerRecord, parse_stats};
use rstest::{fixture, rstest};

use super::*;

const SAMPLE: &str = concat!(
    "# pxname,svname,status,weight,downtime,\n",
    "web,FRONTEND,OPEN,,,\n",
    "web,srv1,UP,100,0,\n",
    "web,srv2,MAINT,50,3725,\n",
    "web,BACKEND,UP,150,0,\n",
    "api,a1,DOWN,0,90061,\n",
);

#[fixture]
fn records() -> Vec<ServerRecord> {
    parse_stats(SAMPLE.as_bytes())
        .expect("parse sample")
        .into_iter()
        .map(ServerRecord::from)
        .collect()
}

fn render(outcome: DispatchOutcome, format: ResolvedOutputFormat, listeners_only: bool) -> String {
    let mut buffer = Vec::new();
    write_outcome(&mut buffer, outcome, format, listeners_only).expect("render");
    String::from_utf8(buffer).expect("utf8 output")
}

#[rstest]
#[case(OutputFormat::Auto, true, ResolvedOutputFormat::Human)]
#[case(OutputFormat::Auto, false, ResolvedOutputFormat::Json)]
#[case(OutputFormat::Human, false, ResolvedOutputFormat::Human)]
#[case(OutputFormat::Json, true, ResolvedOutputFormat::Json)]
fn format_resolution(
    #[case] format: OutputFormat,
    #[case] terminal: bool,
    #[case] expected: ResolvedOutputFormat,
) {
    assert_eq!(format.resolve(terminal), expected);
}

#[rstest]
#[case(None, "-")]
#[case(Some(0), "00:00h")]
#[case(Some(3725), "01:02h")]
#[case(Some(90061), "25:01h")]
fn downtime_formatting(#[case] seconds: Option<u64>, #[case] expected: &str) {
    assert_eq!(format_downtime(seconds), expected);
}

#[rstest]
fn human_tables_group_by_proxy(records: Vec<ServerRecord>) {
    let output = render(
        DispatchOutcome::Stats(records),
        ResolvedOutputFormat::Human,
        false,
    );
    let expected = concat!(
        "web\n",
        "  SERVICE   STATUS  WEIGHT  STATE      BAND       DOWNTIME\n",
        "  FRONTEND  OPEN    -       aggregate  unbounded  -\n",
        "  srv1      UP      100     up         high       00:00h\n",
        "  srv2      MAINT   50      maint      medium     01:02h\n",
        "  BACKEND   UP      150     aggregate  unbounded  00:00h\n",
        "\n",
        "api\n",
        "  SERVICE  STATUS  WEIGHT  STATE  BAND       DOWNTIME\n",
        "  a1       DOWN    0       down   unbounded  25:01h\n",
    );
    assert_eq!(output, expected);
}

#[rstest]
fn listeners_only_drops_aggregates(records: Vec<ServerRecord>) {
    let output = render(
        DispatchOutcome::Stats(records),
        ResolvedOutputFormat::Human,
        true,
    );
    assert!(!output.contains("FRONTEND"), "{output}");
    assert!(!output.contains("BACKEND"), "{output}");
    assert!(output.contains("srv2"), "{output}");
}

#[rstest]
fn json_preserves_header_order(records: Vec<ServerRecord>) {
    let output = render(
        DispatchOutcome::Stats(records),
        ResolvedOutputFormat::Json,
        false,
    );
    let value: serde_json::Value = serde_json::from_str(&output).expect("valid json");
    assert_eq!(value[0]["proxy"], "web");
    assert_eq!(value[0]["servers"][1]["svname"], "srv1");
    assert_eq!(value[1]["proxy"], "api");

    let pxname = output.find("\"# pxname\"").expect("pxname key");
    let status = output.find("\"status\"").expect("status key");
    assert!(pxname < status, "columns must follow header order");
}

#[test]
fn empty_statistics_render_a_notice() {
    let output = render(
        DispatchOutcome::Stats(Vec::new()),
        ResolvedOutputFormat::Human,
        false,
    );
    assert_eq!(output, "no statistics returned\n");
}

#[rstest]
#[case(b"No such server.".as_slice(), "No such server.\n")]
#[case(b"".as_slice(), "")]
fn responses_are_echoed_when_present(#[case] bytes: &[u8], #[case] expected: &str) {
    let output = render(
        DispatchOutcome::Response(bytes.to_vec()),
        ResolvedOutputFormat::Human,
        false,
    );
    assert_eq!(output, expected);
}
