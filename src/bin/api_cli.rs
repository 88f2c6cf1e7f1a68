//! Developer CLI exercising the REST API with built-in example payloads.
//!
//! Usage: api-cli <endpoint> <method> [id]

use std::process::exit;

use serde_json::{Value, json};

const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Endpoint {
    Universities,
    Students,
}

impl Endpoint {
    fn path(&self) -> &'static str {
        match self {
            Endpoint::Universities => "/universities",
            Endpoint::Students => "/students",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Get,
    Post,
    Put,
    Delete,
}

#[derive(Debug, PartialEq, Eq)]
enum CliCommand {
    Help,
    Request {
        endpoint: Endpoint,
        method: Method,
        id: Option<i64>,
    },
}

#[derive(Debug, PartialEq, Eq)]
enum CliError {
    NoArguments,
    UnknownEndpoint(String),
    UnknownMethod(String),
    InvalidId(String),
}

fn parse_args(args: &[String]) -> Result<CliCommand, CliError> {
    let first = match args.first() {
        Some(first) => first,
        None => return Err(CliError::NoArguments),
    };

    if first == "-h" || first == "--help" {
        return Ok(CliCommand::Help);
    }

    let endpoint = match first.to_lowercase().as_str() {
        "universities" => Endpoint::Universities,
        "students" => Endpoint::Students,
        other => return Err(CliError::UnknownEndpoint(other.to_string())),
    };

    let method_arg = args.get(1).ok_or(CliError::NoArguments)?;
    let method = match method_arg.to_lowercase().as_str() {
        "get" => Method::Get,
        "post" => Method::Post,
        "put" => Method::Put,
        "delete" => Method::Delete,
        other => return Err(CliError::UnknownMethod(other.to_string())),
    };

    let id = match args.get(2) {
        Some(raw) => Some(raw.parse().map_err(|_| CliError::InvalidId(raw.clone()))?),
        None => None,
    };

    Ok(CliCommand::Request {
        endpoint,
        method,
        id,
    })
}

fn example_body(endpoint: Endpoint, method: Method) -> Option<Value> {
    match (endpoint, method) {
        (Endpoint::Universities, Method::Post) => Some(json!({
            "name": "New Uni",
            "location": "Boston",
        })),
        (Endpoint::Universities, Method::Put) => Some(json!({
            "name": "Updated University",
            "location": "Remote",
        })),
        (Endpoint::Students, Method::Post) => Some(json!({
            "facultyNumber": "FN999",
            "firstName": "Test",
            "middleName": "Michael",
            "lastName": "Doe",
            "universityId": 1,
        })),
        (Endpoint::Students, Method::Put) => Some(json!({
            "facultyNumber": "FN_UPDATED",
            "firstName": "UpdatedName",
            "lastName": "UpdatedLast",
        })),
        _ => None,
    }
}

fn request_path(endpoint: Endpoint, method: Method, id: Option<i64>) -> String {
    let base = endpoint.path().to_string();
    match method {
        // GET only takes the id when one was supplied; PUT/DELETE need one
        // and default to 1.
        Method::Get => match id {
            Some(id) => format!("{}/{}", base, id),
            None => base,
        },
        Method::Post => base,
        Method::Put | Method::Delete => format!("{}/{}", base, id.unwrap_or(1)),
    }
}

fn show_help() {
    println!(
        r#"Student-University API CLI Tool

USAGE:
  api-cli <endpoint> <method> [id]

ENDPOINTS:
  universities        Work with universities
  students            Work with students

METHODS:
  get                 GET request (list all or by ID)
  post                POST request (create new, example payload)
  put                 PUT request (update existing, example payload)
  delete              DELETE request (delete by ID)

EXAMPLES:
  api-cli universities get
  api-cli universities get 1
  api-cli universities post
  api-cli universities put 1
  api-cli universities delete 1
  api-cli students get 2
  api-cli students post
  api-cli students put 2
  api-cli students delete 3

The base URL is taken from the API_URL environment variable
(default: {DEFAULT_BASE_URL})."#
    );
}

fn print_response(method: Method, path: &str, status: u16, body: &Value) {
    let method_name = match method {
        Method::Get => "GET",
        Method::Post => "POST",
        Method::Put => "PUT",
        Method::Delete => "DELETE",
    };
    let separator = "═".repeat(60);
    println!("\n{}", separator);
    println!("{} {}", method_name, path);
    println!("{}", separator);
    println!("Status: {}", status);
    println!("\nResponse:");
    match serde_json::to_string_pretty(body) {
        Ok(pretty) => println!("{}", pretty),
        Err(_) => println!("{}", body),
    }
    println!("{}\n", separator);
}

async fn run_request(
    endpoint: Endpoint,
    method: Method,
    id: Option<i64>,
) -> Result<(), reqwest::Error> {
    let base_url = std::env::var("API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    let path = request_path(endpoint, method, id);
    let url = format!("{}{}", base_url, path);

    let client = reqwest::Client::new();
    let mut builder = match method {
        Method::Get => client.get(&url),
        Method::Post => client.post(&url),
        Method::Put => client.put(&url),
        Method::Delete => client.delete(&url),
    };

    if let Some(body) = example_body(endpoint, method) {
        builder = builder.json(&body);
    }

    let response = builder.send().await?;
    let status = response.status().as_u16();

    let body = match response.json::<Value>().await {
        Ok(body) => body,
        // 204 and other empty replies have no JSON body.
        Err(_) => json!({ "message": "Request successful, no JSON body." }),
    };

    print_response(method, &path, status, &body);
    Ok(())
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(CliError::NoArguments) => {
            show_help();
            exit(1);
        }
        Err(CliError::UnknownEndpoint(endpoint)) => {
            eprintln!("Unknown endpoint: {}\n", endpoint);
            show_help();
            exit(1);
        }
        Err(CliError::UnknownMethod(method)) => {
            eprintln!("Unknown method: {}\n", method);
            show_help();
            exit(1);
        }
        Err(CliError::InvalidId(raw)) => {
            eprintln!("Invalid id: {}\n", raw);
            show_help();
            exit(1);
        }
    };

    match command {
        CliCommand::Help => {
            show_help();
            exit(0);
        }
        CliCommand::Request {
            endpoint,
            method,
            id,
        } => {
            if let Err(e) = run_request(endpoint, method, id).await {
                eprintln!("Request failed: {}", e);
                exit(1);
            }
        }
    }
}
