//! In-process employee backend used by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::TcpListener;
use std::sync::Mutex;
use std::time::Duration;

use actix_multipart::form::{MultipartForm, tempfile::TempFile, text::Text};
use actix_web::{App, HttpRequest, HttpResponse, HttpServer, Responder, delete, get, post, put, web};
use serde::Deserialize;
use serde_json::{Value, json};

use hr_settings::repository::HttpRepository;

pub const TOKEN: &str = "tok-123";
/// Token of an account the backend no longer knows.
pub const DELETED_USER_TOKEN: &str = "tok-gone";

#[derive(Default)]
pub struct BackendState {
    pub profiles: HashMap<String, Value>,
    pub password: String,
    pub update_count: usize,
    /// Part names of the last multipart update, in arrival order.
    pub uploaded_files: Vec<(String, String)>,
}

pub struct FakeBackend {
    pub base_url: String,
    pub state: web::Data<Mutex<BackendState>>,
}

impl FakeBackend {
    pub fn repository(&self) -> HttpRepository {
        HttpRepository::new(&self.base_url, Duration::from_secs(5)).expect("valid base url")
    }

    pub fn profile(&self, id: &str) -> Value {
        self.state.lock().unwrap().profiles[id].clone()
    }

    pub fn update_count(&self) -> usize {
        self.state.lock().unwrap().update_count
    }
}

pub fn sample_profile() -> Value {
    json!({
        "_id": "665f1c",
        "employeeId": "E-7",
        "name": "Asha Rao",
        "email": "asha@example.com",
        "contact": "9876543210",
        "department": "Finance",
        "salary": 52000,
        "casualLeaveBalance": 4,
        "dob": "1990-04-01T00:00:00.000Z",
        "currentAddress": { "street": "Park Street", "city": "Kolkata", "state": "West Bengal", "zip": "700016" },
        "permanentAddress": null,
        "bankDetails": { "bankName": "HDFC", "accountNumber": "001122", "ifsc": "HDFC0001" },
        "image": "avatars/asha.png"
    })
}

fn message(text: &str) -> Value {
    json!({ "message": text })
}

#[get("/employees/{id}")]
async fn get_employee(
    id: web::Path<String>,
    state: web::Data<Mutex<BackendState>>,
) -> impl Responder {
    let state = state.lock().unwrap();
    match state.profiles.get(id.as_str()) {
        Some(profile) => HttpResponse::Ok().json(profile),
        None => HttpResponse::NotFound().json(message("Employee not found")),
    }
}

#[derive(MultipartForm)]
struct ProfileUpdateForm {
    contact: Option<Text<String>>,
    #[multipart(rename = "currentAddress")]
    current_address: Option<Text<String>>,
    #[multipart(rename = "panCardPdf")]
    pan_card_pdf: Option<TempFile>,
    image: Option<TempFile>,
}

fn trimmed_address(raw: &str) -> Value {
    let mut address: Value = serde_json::from_str(raw).unwrap_or_else(|_| json!({}));
    if let Some(fields) = address.as_object_mut() {
        for value in fields.values_mut() {
            if let Some(text) = value.as_str() {
                *value = Value::String(text.trim().to_string());
            }
        }
    }
    address
}

#[put("/employees/{id}")]
async fn put_employee(
    id: web::Path<String>,
    state: web::Data<Mutex<BackendState>>,
    MultipartForm(form): MultipartForm<ProfileUpdateForm>,
) -> impl Responder {
    let mut state = state.lock().unwrap();
    state.update_count += 1;
    state.uploaded_files.clear();

    for (name, file) in [("panCardPdf", &form.pan_card_pdf), ("image", &form.image)] {
        if let Some(file) = file {
            let file_name = file.file_name.clone().unwrap_or_default();
            state.uploaded_files.push((name.to_string(), file_name));
        }
    }
    let uploaded = state.uploaded_files.clone();

    let Some(profile) = state.profiles.get_mut(id.as_str()) else {
        return HttpResponse::NotFound().json(message("Employee not found"));
    };
    if let Some(contact) = form.contact {
        profile["contact"] = Value::String(contact.into_inner());
    }
    if let Some(address) = form.current_address {
        profile["currentAddress"] = trimmed_address(&address);
    }
    for (name, file_name) in uploaded {
        profile[name.as_str()] = Value::String(format!("uploads/{file_name}"));
    }

    HttpResponse::Ok().json(json!({ "message": "Profile updated", "employee": profile }))
}

#[delete("/employees/{id}/image")]
async fn delete_image(
    id: web::Path<String>,
    state: web::Data<Mutex<BackendState>>,
) -> impl Responder {
    if id.as_str() == "broken" {
        return HttpResponse::InternalServerError().json(message("Image store unavailable"));
    }
    let mut state = state.lock().unwrap();
    match state.profiles.get_mut(id.as_str()) {
        Some(profile) => {
            if let Some(fields) = profile.as_object_mut() {
                fields.remove("image");
            }
            HttpResponse::Ok().json(json!({ "employee": profile }))
        }
        None => HttpResponse::NotFound().json(message("Employee not found")),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordBody {
    current_password: String,
    new_password: String,
    confirm_password: String,
}

#[post("/change-password")]
async fn change_password(
    req: HttpRequest,
    body: web::Json<PasswordBody>,
    state: web::Data<Mutex<BackendState>>,
) -> impl Responder {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if bearer == format!("Bearer {DELETED_USER_TOKEN}") {
        return HttpResponse::NotFound().json(message("User not found"));
    }
    if bearer != format!("Bearer {TOKEN}") {
        return HttpResponse::Unauthorized().json(message("Unauthorized"));
    }

    let mut state = state.lock().unwrap();
    if body.current_password != state.password {
        return HttpResponse::BadRequest().json(message("Current password is incorrect"));
    }
    if body.new_password != body.confirm_password {
        return HttpResponse::BadRequest().json(message("Passwords do not match"));
    }
    state.password = body.new_password.clone();
    HttpResponse::Ok().json(message("Password changed successfully"))
}

/// Starts the backend on an ephemeral port with one profile, `emp-1`.
pub fn start_backend() -> FakeBackend {
    let mut state = BackendState {
        password: "Old#pass1".to_string(),
        ..BackendState::default()
    };
    state.profiles.insert("emp-1".to_string(), sample_profile());
    let state = web::Data::new(Mutex::new(state));

    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    let server_state = state.clone();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(server_state.clone())
            .service(get_employee)
            .service(put_employee)
            .service(delete_image)
            .service(change_password)
    })
    .workers(1)
    .disable_signals()
    .listen(listener)
    .expect("listen on ephemeral port")
    .run();
    actix_web::rt::spawn(server);

    FakeBackend {
        base_url: format!("http://{addr}"),
        state,
    }
}

/// A base url nothing listens on.
pub fn closed_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{addr}")
}
