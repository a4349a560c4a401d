use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}

impl Health {
    pub fn ok() -> Self { Self { status: "ok" } }
}

/// Uniform `{"ok": true}` acknowledgement returned by write endpoints.
#[derive(Serialize, Debug)]
pub struct Ack {
    pub ok: bool,
}
