// Canned transports for running the views without a backend.
// Each operation answers according to its `<fixture key>_stub` session attribute:
// "" or "1" success, "4" not found, "5" system error, "11" timeout, "12" network error.
// The list search also pages by the request's `offset` under "6" and "7".

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::envelope::{Envelope, ErrorCode, RawEnvelope};
use crate::domain::exchange::{Exchange, TransportRequest, Verb};
use crate::domain::operations::Operation;
use crate::domain::payload::Payload;
use crate::domain::ports::{SessionStore, Transport};
use crate::domain::prescriptions::{
    DcfCodeResponse, PrescriptionDispResponse, PrescriptionInfo, PrescriptionListSearchResponse,
    ProjectInfo, ProjectNamesResponse, SystemSettingsResponse,
};

pub const DEFAULT_FIXTURE_LATENCY: Duration = Duration::from_secs(1);

// Builds the canned envelope from the selector value and the request payload.
pub type FixtureFn = fn(&str, &Payload) -> RawEnvelope;

// Fixtures registered by operation name.
pub struct FixtureRegistry {
    fixtures: HashMap<&'static str, FixtureFn>,
}

impl FixtureRegistry {
    pub fn empty() -> Self {
        Self {
            fixtures: HashMap::new(),
        }
    }

    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(Operation::DcfCode.name(), dcf_code);
        registry.register(Operation::PrescriptionDisp.name(), prescription_disp);
        registry.register(
            Operation::PrescriptionListSearch.name(),
            prescription_list_search,
        );
        registry.register(Operation::ProjectNames.name(), project_names);
        registry.register(Operation::SystemSettings.name(), system_settings);
        registry
    }

    pub fn register(&mut self, name: &'static str, fixture: FixtureFn) {
        self.fixtures.insert(name, fixture);
    }

    pub fn get(&self, name: &str) -> Option<FixtureFn> {
        self.fixtures.get(name).copied()
    }

    pub fn transport_for(
        &self,
        operation: Operation,
        session: Arc<dyn SessionStore>,
        latency: Duration,
    ) -> Option<FixtureTransport> {
        let respond = self.get(operation.name())?;
        Some(FixtureTransport {
            selector_key: operation.fixture_selector_key(),
            respond,
            latency,
            session,
        })
    }
}

impl Default for FixtureRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

// Transport stand-in: waits a fixed latency, then answers from a fixture.
pub struct FixtureTransport {
    selector_key: String,
    respond: FixtureFn,
    latency: Duration,
    session: Arc<dyn SessionStore>,
}

#[async_trait]
impl Transport for FixtureTransport {
    async fn exchange(&self, request: TransportRequest) -> Exchange {
        tokio::time::sleep(self.latency).await;

        // Fixtures only model the read verb.
        if request.verb != Verb::Read {
            tracing::warn!(verb = %request.verb, path = %request.path, "fixture has no such verb");
            return Exchange::delivered(RawEnvelope::with_code(ErrorCode::Unknown));
        }

        let selector = self.session.get(&self.selector_key);
        tracing::debug!(selector_key = %self.selector_key, %selector, "answering from fixture");
        Exchange::delivered((self.respond)(&selector, &request.payload))
    }
}

// Selectors shared by every fixture.
fn shared_error(selector: &str) -> Option<ErrorCode> {
    match selector {
        "4" => Some(ErrorCode::NotFound),
        "5" => Some(ErrorCode::InternalServerError),
        "11" => Some(ErrorCode::Timeout),
        "12" => Some(ErrorCode::Network),
        _ => None,
    }
}

fn ok<T: Serialize>(body: T) -> RawEnvelope {
    Envelope {
        error_code: ErrorCode::Ok,
        error_message: String::new(),
        error_level: String::new(),
        body,
    }
    .into_raw()
    .unwrap_or_else(|_| RawEnvelope::with_code(ErrorCode::Unknown))
}

fn dcf_code(selector: &str, _payload: &Payload) -> RawEnvelope {
    match selector {
        "" | "1" => ok(DcfCodeResponse {
            dcf_cod: vec!["1111111".to_string(), "2222222".to_string()],
        }),
        other => match shared_error(other) {
            Some(code) => RawEnvelope::with_code(code),
            None => ok(DcfCodeResponse::default()),
        },
    }
}

fn project_names(selector: &str, _payload: &Payload) -> RawEnvelope {
    let project = |code: &str, name: &str| ProjectInfo {
        kkk_cod: code.to_string(),
        kkk_nm: name.to_string(),
    };
    match selector {
        "" | "1" => ok(ProjectNamesResponse {
            lst_kkk_inf: vec![
                project("111111", "○○企画"),
                project("222222", "◇◇企画"),
                project("333333", "△△企画企画企画企画企画企画"),
            ],
        }),
        other => match shared_error(other) {
            Some(code) => RawEnvelope::with_code(code),
            None => ok(ProjectNamesResponse::default()),
        },
    }
}

fn system_settings(selector: &str, _payload: &Payload) -> RawEnvelope {
    match selector {
        "" | "1" => ok(SystemSettingsResponse {
            pass_change_url: "https://id.example.com/update_password".to_string(),
            logout_url: "https://id.example.com/logout?returnTo=http://example.com&client_id=hoge"
                .to_string(),
        }),
        other => match shared_error(other) {
            Some(code) => RawEnvelope::with_code(code),
            None => ok(SystemSettingsResponse::default()),
        },
    }
}

fn prescription_disp(selector: &str, _payload: &Payload) -> RawEnvelope {
    let base = PrescriptionDispResponse {
        pre_kkk_nm: "○○企画".to_string(),
        pre_nhn_nm: "A薬局".to_string(),
        pre_dnp_ymd: "2025/04/03".to_string(),
        pre_dnp_no: "XXXXXXX-XXX-XXX".to_string(),
        pre_syh_kkk_yry: "ゼポジアカプセル スターターパック7カプセル".to_string(),
        pre_syh_cod: "49876-123".to_string(),
        pre_hnb_num: "3".to_string(),
        pre_cod: 1,
        pre_dp_cod: 1,
        ..Default::default()
    };
    match selector {
        // Prescriber still unknown, doctor input allowed.
        "1" => ok(PrescriptionDispResponse {
            pre_tok_cod: "0000-00".to_string(),
            pre_dr_input_flg: 1,
            ..base
        }),
        other => match shared_error(other) {
            Some(code) => RawEnvelope::with_code(code),
            // Fully populated record.
            None => ok(PrescriptionDispResponse {
                pre_tok_cod: "0000000".to_string(),
                pre_dcf_cod: "123456789".to_string(),
                pre_nm: "ＡＡＡ病院".to_string(),
                pre_ful_nm: "正式".to_string(),
                pre_dr: "医者太郎".to_string(),
                pre_dp: "内科".to_string(),
                pre_stat_flg: 1,
                ..base
            }),
        },
    }
}

fn sample_row() -> PrescriptionInfo {
    PrescriptionInfo {
        shm_kkk_cod: "111111".to_string(),
        shm_kkk_nm: "○○企画".to_string(),
        shm_egb_nm: "営業1".to_string(),
        shm_stn_nm: "A支店".to_string(),
        shm_ka_nm: "AA課".to_string(),
        shm_tts_nm: "佐藤太郎".to_string(),
        shm_dpy_bno: "222222".to_string(),
        shm_dpy_kno_gb: "333333".to_string(),
        shm_dpy_no: "444444".to_string(),
        shm_dpy_rno: "555555".to_string(),
        shm_urg_ymd: "2025/02/07".to_string(),
        shm_hbm_nm: "○○製薬".to_string(),
        shm_syh_nm: "○○○○薬".to_string(),
        shm_syh_kkk_yry_nm: "ゼポジアカプセル スターターパック7カプセル (49876-123)".to_string(),
        shm_nhn_cod: "6666666".to_string(),
        shm_nhn_nm: "◇◇薬局".to_string(),
        shm_hnb_nm: "3".to_string(),
        shm_nm: "△△病院".to_string(),
        shm_dcf_cod: "777777777".to_string(),
        shm_dr_nm: "医者太郎次郎".to_string(),
        shm_mail_adr_mr: "tokuisaki@example.com".to_string(),
        shm_kkn_ymd: "2025/02/10".to_string(),
        shm_stat_cod: "2".to_string(),
        shm_nrk_ymd: "2025/02/08".to_string(),
        shm_ksn_ymd: "2025/03/10".to_string(),
    }
}

fn rows(offset: u64, count: usize, all_su: u64) -> PrescriptionListSearchResponse {
    PrescriptionListSearchResponse {
        all_su,
        sta_row: offset,
        end_row: (offset + count as u64).saturating_sub(1),
        shm_inf: vec![sample_row(); count],
        shm_dr_input_disabled_flg: 0,
    }
}

// Full pages until the last row, which comes back alone at `last_offset`.
fn paged(offset: u64, last_offset: u64) -> PrescriptionListSearchResponse {
    let count = if offset == last_offset { 1 } else { 50 };
    PrescriptionListSearchResponse {
        shm_dr_input_disabled_flg: 2,
        ..rows(offset, count, last_offset)
    }
}

fn prescription_list_search(selector: &str, payload: &Payload) -> RawEnvelope {
    let offset = payload.get("offset").and_then(Value::as_u64).unwrap_or(1);
    match selector {
        // Four full pages.
        "" | "1" => ok(rows(offset, 50, 200)),
        // Fewer rows than a page, no follow-up search.
        "2" => ok(rows(offset, 10, 10)),
        // Exactly one full page.
        "3" => ok(rows(offset, 50, 50)),
        // 101 rows: two full pages, then one row at offset 101.
        "6" => ok(paged(offset, 101)),
        // 51 rows: one full page, then one row at offset 51.
        "7" => ok(paged(offset, 51)),
        "9" => RawEnvelope::with_code(ErrorCode::NotFound),
        "10" => RawEnvelope::with_code(ErrorCode::InternalServerError),
        other => match shared_error(other) {
            Some(code) => RawEnvelope::with_code(code),
            None => ok(PrescriptionListSearchResponse {
                shm_dr_input_disabled_flg: 1,
                ..Default::default()
            }),
        },
    }
}
