//! End-to-end tests of the harvest pipeline against a mocked GitHub

use awesome_harvest_lib::facts::{ORGANIZATION_COLUMNS, OrganizationRecord, PROJECT_COLUMNS, ProjectRecord};
use awesome_harvest_lib::{Host, run};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use camino::{Utf8Path, Utf8PathBuf};
use serde_json::json;
use std::io::Write;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const AWESOME_README: &str = "\
# Awesome Acme

## Contents
- [Tools](#tools)
- [Organizations](#organizations)

## Tools
- [Foo](https://github.com/acme/foo) - A tool for X.
- [Broken](https://github.com/acme/broken) - Never answers.
- [Bar](https://gitlab.com/group/bar) - Battery models.

## Organizations
- [OrgProj](https://github.com/acme/orgproj) - Backed by an organization.
- [Site](https://example.org/tools/site) - A website.
";

const PROJECT_README: &str = "# Foo\n\nCite as https://doi.org/10.5281/zenodo.123 ![badge](https://zenodo.org/badge.svg)\n";

const TOKEN: &str = "test-token";

struct TestHost {
    output_buf: Vec<u8>,
    error_buf: Vec<u8>,
}

impl TestHost {
    const fn new() -> Self {
        Self {
            output_buf: Vec::new(),
            error_buf: Vec::new(),
        }
    }

    fn output_str(&self) -> String {
        String::from_utf8_lossy(&self.output_buf).to_string()
    }

    fn error_str(&self) -> String {
        String::from_utf8_lossy(&self.error_buf).to_string()
    }
}

impl Host for TestHost {
    fn output(&mut self) -> impl Write {
        &mut self.output_buf
    }

    fn error(&mut self) -> impl Write {
        &mut self.error_buf
    }
}

fn encoded(text: &str) -> serde_json::Value {
    json!({ "content": STANDARD.encode(text), "encoding": "base64" })
}

fn ok_json(body: &serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

async fn mount(server: &MockServer, mock: Mock) {
    mock.mount(server).await;
}

/// Shared sub-resource path for the two healthy GitHub projects.
fn repo_path(suffix: &str) -> String {
    format!(r"^/repos/acme/(foo|orgproj){suffix}$")
}

async fn mock_github(server: &MockServer) {
    mount(
        server,
        Mock::given(method("GET")).and(path("/rate_limit")).respond_with(ok_json(&json!({
            "resources": { "core": { "limit": 5000, "remaining": 4999, "reset": 4_102_444_800_i64 } }
        }))),
    )
    .await;

    mount(
        server,
        Mock::given(method("GET"))
            .and(path("/repos/acme/awesome/contents/README.md"))
            .and(header("authorization", format!("token {TOKEN}").as_str()))
            .respond_with(ok_json(&encoded(AWESOME_README))),
    )
    .await;

    mount(
        server,
        Mock::given(method("GET"))
            .and(path("/repos/acme/broken"))
            .respond_with(ResponseTemplate::new(500)),
    )
    .await;

    mount(
        server,
        Mock::given(method("GET")).and(path("/repos/acme/foo")).respond_with(ok_json(&json!({
            "owner": { "login": "acme" },
            "clone_url": "https://github.com/acme/foo.git",
            "homepage": "https://foo.example",
            "stargazers_count": 0,
            "archived": false,
            "created_at": "2020-01-01T00:00:00Z",
            "topics": ["energy", "storage"],
            "organization": null
        }))),
    )
    .await;

    mount(
        server,
        Mock::given(method("GET")).and(path("/repos/acme/orgproj")).respond_with(ok_json(&json!({
            "owner": { "login": "acmeorg" },
            "clone_url": "https://github.com/acmeorg/orgproj.git",
            "homepage": "",
            "stargazers_count": 0,
            "archived": true,
            "created_at": "2021-06-01T00:00:00Z",
            "organization": { "login": "acmeorg" }
        }))),
    )
    .await;

    mount(
        server,
        Mock::given(method("GET"))
            .and(path_regex(repo_path("/contents")))
            .respond_with(ok_json(&json!([{ "path": "README.md" }, { "path": "CONTRIBUTING.md" }]))),
    )
    .await;

    // Specific issue queries outrank the generic open-issue listing.
    mount(
        server,
        Mock::given(method("GET"))
            .and(path_regex(repo_path("/issues")))
            .and(query_param("labels", "good first issue"))
            .respond_with(ok_json(&json!([])))
            .with_priority(1),
    )
    .await;
    mount(
        server,
        Mock::given(method("GET"))
            .and(path_regex(repo_path("/issues")))
            .and(query_param("state", "closed"))
            .respond_with(ok_json(&json!([])))
            .with_priority(1),
    )
    .await;
    mount(
        server,
        Mock::given(method("GET"))
            .and(path_regex(repo_path("/issues")))
            .and(query_param("state", "open"))
            .respond_with(ok_json(&json!([{ "number": 7 }]))),
    )
    .await;

    mount(
        server,
        Mock::given(method("GET"))
            .and(path_regex(repo_path("/pulls")))
            .respond_with(ok_json(&json!([]))),
    )
    .await;

    mount(
        server,
        Mock::given(method("GET")).and(path_regex(repo_path("/commits"))).respond_with(
            ok_json(&json!([{ "commit": { "committer": { "date": "2024-05-01T10:00:00Z" } } }]))
                .insert_header("last-modified", "Wed, 01 May 2024 10:00:00 GMT"),
        ),
    )
    .await;

    mount(
        server,
        Mock::given(method("GET"))
            .and(path_regex(repo_path("/license")))
            .respond_with(ok_json(&json!({ "license": { "spdx_id": "MIT" } }))),
    )
    .await;

    mount(
        server,
        Mock::given(method("GET"))
            .and(path_regex(repo_path("/languages")))
            .respond_with(ok_json(&json!({ "Rust": 10, "Python": 1000 }))),
    )
    .await;

    mount(
        server,
        Mock::given(method("GET"))
            .and(path("/repos/acme/foo/readme"))
            .respond_with(ok_json(&encoded(PROJECT_README))),
    )
    .await;

    mount(
        server,
        Mock::given(method("GET"))
            .and(path_regex(repo_path("/stats/contributors")))
            .respond_with(ok_json(&json!([{ "total": 3 }, { "total": 1 }]))),
    )
    .await;

    mount(
        server,
        Mock::given(method("GET"))
            .and(path_regex(repo_path("/contributors")))
            .respond_with(ok_json(&json!([{ "login": "a" }, { "login": "b" }]))),
    )
    .await;

    mount(
        server,
        Mock::given(method("GET")).and(path("/orgs/acmeorg")).respond_with(ok_json(&json!({
            "login": "acmeorg",
            "name": "Acme Org",
            "html_url": "https://github.com/acmeorg",
            "blog": "",
            "location": "Berlin",
            "avatar_url": "https://avatars.example/acmeorg",
            "created_at": "2019-03-04T05:06:07Z"
        }))),
    )
    .await;

    mount(
        server,
        Mock::given(method("GET"))
            .and(path("/search/repositories"))
            .and(query_param("q", "user:acmeorg"))
            .respond_with(ok_json(&json!({
                "total_count": 5,
                "items": [{ "updated_at": "2024-06-01T00:00:00Z" }]
            }))),
    )
    .await;

    mount(
        server,
        Mock::given(method("GET"))
            .and(path("/acme/foo/network/dependents"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body><div class="Box-row">
                     <a data-hovercard-type="user" data-repository-hovercards-enabled="" href="/x">x</a> /
                     <a data-hovercard-type="repository" href="/x/y">y</a>
                   </div></body></html>"#,
            )),
    )
    .await;
}

struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    fn new(server: &MockServer) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::try_from(dir.path().to_path_buf()).unwrap();

        std::fs::write(
            root.join("harvest.toml"),
            format!(
                "api_base_url = \"{uri}\"\nweb_base_url = \"{uri}\"\nrequest_timeout_secs = 10\n",
                uri = server.uri()
            ),
        )
        .unwrap();

        Self { _dir: dir, root }
    }

    fn projects(&self) -> Utf8PathBuf {
        self.root.join("csv/projects.csv")
    }

    fn orgs(&self) -> Utf8PathBuf {
        self.root.join("csv/github_organizations.csv")
    }

    fn args(&self, key: &str) -> Vec<String> {
        [
            "awesome-harvest",
            "--awesome-repo-url",
            "https://github.com/acme/awesome",
            "--github-api-key",
            key,
            "--config",
            self.root.join("harvest.toml").as_str(),
            "--local-readme-path",
            self.root.join("cache/README.md").as_str(),
            "--projects-csv-path",
            self.projects().as_str(),
            "--orgs-csv-path",
            self.orgs().as_str(),
            "--color",
            "never",
        ]
        .iter()
        .map(ToString::to_string)
        .collect()
    }
}

fn read_projects(path: &Utf8Path) -> Vec<ProjectRecord> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(ToString::to_string).collect();
    assert_eq!(headers, PROJECT_COLUMNS);
    reader.deserialize().map(Result::unwrap).collect()
}

fn read_orgs(path: &Utf8Path) -> Vec<OrganizationRecord> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(ToString::to_string).collect();
    assert_eq!(headers, ORGANIZATION_COLUMNS);
    reader.deserialize().map(Result::unwrap).collect()
}

fn find<'a>(rows: &'a [ProjectRecord], name: &str) -> &'a ProjectRecord {
    rows.iter()
        .find(|r| r.project_name.as_deref() == Some(name))
        .unwrap_or_else(|| panic!("no row for '{name}'"))
}

#[tokio::test]
async fn test_full_harvest() {
    let server = MockServer::start().await;
    mock_github(&server).await;
    let ws = Workspace::new(&server);

    let mut host = TestHost::new();
    run(&mut host, ws.args(TOKEN)).await.unwrap();

    let output = host.output_str();
    assert!(output.contains("Starting harvest of https://github.com/acme/awesome"));
    assert!(output.contains("Found 5 projects in 2 rubrics."));
    assert!(output.contains("Harvest complete: 4 projects written, 1 new organizations."));

    let errors = host.error_str();
    assert!(errors.contains("Unable to gather information for 1 project(s):"));
    assert!(errors.contains("  https://github.com/acme/broken"));

    assert!(ws.root.join("cache/README.md").exists());

    let rows = read_projects(&ws.projects());
    let names: Vec<_> = rows.iter().filter_map(|r| r.project_name.as_deref()).collect();
    assert_eq!(names, ["Foo", "Bar", "OrgProj", "Site"]);

    let foo = find(&rows, "Foo");
    assert_eq!(foo.oneliner.as_deref(), Some("A tool for X."));
    assert_eq!(foo.platform.as_deref(), Some("github"));
    assert_eq!(foo.rubric.as_deref(), Some("Tools"));
    assert_eq!(foo.git_namespace.as_deref(), Some("acme"));
    assert_eq!(foo.git_url.as_deref(), Some("https://github.com/acme/foo.git"));
    assert_eq!(foo.topics.as_deref(), Some("energy,storage"));
    assert_eq!(foo.homepage.as_deref(), Some("https://foo.example"));
    assert_eq!(foo.license.as_deref(), Some("MIT"));
    assert_eq!(foo.languages.as_deref(), Some("Python,Rust"));
    assert_eq!(foo.dominating_language.as_deref(), Some("Python"));
    assert_eq!(foo.last_commit_date.as_deref(), Some("2024/05/01, 10:00:00"));
    assert_eq!(foo.project_created.as_deref(), Some("2020/01/01, 00:00:00"));
    assert_eq!(foo.open_issues, Some(1));
    assert_eq!(foo.closed_issues, Some(0));
    assert_eq!(foo.good_first_issue, Some(0));
    assert_eq!(foo.open_pullrequests, Some(0));
    assert_eq!(foo.closed_pullrequests, Some(0));
    assert_eq!(foo.reviews_per_pr, Some(0.0));
    assert_eq!(foo.total_number_of_commits, Some(1));
    assert_eq!(foo.total_commits_last_year, Some(1));
    assert_eq!(foo.project_active, Some(true));
    assert_eq!(foo.stars_last_year, Some(0));
    assert_eq!(foo.contributors, Some(2));
    assert_eq!(foo.development_distribution_score, Some(0.25));
    assert_eq!(foo.number_of_dependents, Some(1));
    assert_eq!(foo.dependents_repos.as_deref(), Some("x/y"));
    assert_eq!(foo.refs.as_deref(), Some("https://doi.org/10.5281/zenodo.123"));
    assert_eq!(foo.readme_content.as_deref(), Some(PROJECT_README));
    assert_eq!(foo.code_of_conduct, Some(false));
    assert_eq!(foo.contribution_guide, Some(true));
    assert_eq!(foo.accepts_donations, Some(false));
    assert_eq!(foo.last_issue_closed, None);
    assert_eq!(foo.days_until_last_issue_closed, None);
    assert_eq!(foo.last_release_tag_name, None);
    assert_eq!(foo.organization_user_name, None);

    let bar = find(&rows, "Bar");
    assert_eq!(bar.platform.as_deref(), Some("gitlab"));
    assert_eq!(bar.git_url.as_deref(), Some("https://gitlab.com/group/bar"));
    assert_eq!(bar.git_namespace.as_deref(), Some("group"));
    assert_eq!(bar.homepage, None);
    assert_eq!(bar.stargazers_count, None);

    let site = find(&rows, "Site");
    assert_eq!(site.platform.as_deref(), Some("custom"));
    assert_eq!(site.homepage.as_deref(), Some("https://example.org/tools/site"));
    assert_eq!(site.rubric.as_deref(), Some("Organizations"));

    let org_proj = find(&rows, "OrgProj");
    assert_eq!(org_proj.project_active, Some(false));
    assert_eq!(org_proj.homepage, None);
    assert_eq!(org_proj.readme_content, None);
    assert_eq!(org_proj.number_of_dependents, Some(0));
    assert_eq!(org_proj.organization.as_deref(), Some("Acme Org"));
    assert_eq!(org_proj.organization_user_name.as_deref(), Some("acmeorg"));
    assert_eq!(org_proj.organization_location.as_deref(), Some("Berlin"));
    assert_eq!(org_proj.organization_public_repos, Some(5));

    let orgs = read_orgs(&ws.orgs());
    assert_eq!(orgs.len(), 1);
    assert_eq!(orgs[0].organization_user_name, "acmeorg");
    assert_eq!(orgs[0].organization_website, None);
    assert_eq!(orgs[0].organization_rubric.as_deref(), Some("Organizations"));
    assert_eq!(orgs[0].organization_last_update.as_deref(), Some("2024/06/01, 00:00:00"));
}

#[tokio::test]
async fn test_second_run_reuses_known_organizations() {
    let server = MockServer::start().await;
    mock_github(&server).await;
    let ws = Workspace::new(&server);

    run(&mut TestHost::new(), ws.args(TOKEN)).await.unwrap();

    let mut host = TestHost::new();
    run(&mut host, ws.args(TOKEN)).await.unwrap();
    assert!(host.output_str().contains("4 projects written, 0 new organizations."));

    assert_eq!(read_projects(&ws.projects()).len(), 4);

    let orgs = read_orgs(&ws.orgs());
    assert_eq!(orgs.len(), 1);

    let org_proj = read_projects(&ws.projects())
        .into_iter()
        .find(|r| r.project_name.as_deref() == Some("OrgProj"))
        .unwrap();
    assert_eq!(org_proj.organization_user_name.as_deref(), Some("acmeorg"));
}

#[tokio::test]
async fn test_existing_organization_row_with_bad_cells_is_reused() {
    let server = MockServer::start().await;
    mock_github(&server).await;
    let ws = Workspace::new(&server);

    std::fs::create_dir_all(ws.root.join("csv")).unwrap();
    std::fs::write(
        ws.orgs(),
        format!("{}\nAcme Org,acmeorg,,,,,,,12 repos,,,Organizations\n", ORGANIZATION_COLUMNS.join(",")),
    )
    .unwrap();

    let mut host = TestHost::new();
    run(&mut host, ws.args(TOKEN)).await.unwrap();
    assert!(host.output_str().contains("4 projects written, 0 new organizations."));

    let orgs = std::fs::read_to_string(ws.orgs()).unwrap();
    assert_eq!(orgs.lines().filter(|l| l.contains(",acmeorg,")).count(), 1);

    let rows = read_projects(&ws.projects());
    let org_proj = find(&rows, "OrgProj");
    assert_eq!(org_proj.organization.as_deref(), Some("Acme Org"));
    assert_eq!(org_proj.organization_user_name.as_deref(), Some("acmeorg"));
    assert_eq!(org_proj.organization_public_repos, None);
}

#[tokio::test]
async fn test_blank_key_fails_before_any_request() {
    let server = MockServer::start().await;
    let ws = Workspace::new(&server);

    let mut host = TestHost::new();
    let result = run(&mut host, ws.args("  ")).await;

    let _ = result.unwrap_err();
    assert!(host.error_str().contains("A GitHub API key is required"));
    assert!(!ws.projects().exists());
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_missing_awesome_list_aborts() {
    let server = MockServer::start().await;
    let ws = Workspace::new(&server);

    let result = run(&mut TestHost::new(), ws.args(TOKEN)).await;

    let _ = result.unwrap_err();
    assert!(!ws.projects().exists());
}
