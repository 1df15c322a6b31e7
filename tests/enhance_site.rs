use std::path::Path;

use tempfile::tempdir;
use url::Url;

const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Intro</title>
  </head>
  <body data-md-color-scheme="default">
    <article class="md-content">
      <p>A complete program:</p>
      <div class="highlight"><pre><code class="language-cpp">#include &lt;cstdio&gt;

int main() {
    std::puts("hi");
}</code></pre></div>
    </article>
  </body>
</html>
"#;

const GUIDE_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Setup</title>
  </head>
  <body data-md-color-scheme="default">
    <article class="md-content">
      <div class="highlight"><pre><code class="language-c++">template &lt;class T&gt;
T twice(T v) { return v + v; }</code></pre></div>
      <div class="highlight"><pre><code class="language-python">print("not c++")</code></pre></div>
    </article>
  </body>
</html>
"#;

fn write_site(dir: &Path) {
    std::fs::create_dir_all(dir.join("guide")).unwrap();
    std::fs::write(dir.join("index.html"), INDEX_PAGE).unwrap();
    std::fs::write(dir.join("guide/setup.html"), GUIDE_PAGE).unwrap();
}

fn args(input: &Path, config: &Path) -> docsite_enhance::CliArgs {
    docsite_enhance::CliArgs {
        input: input.to_path_buf(),
        out: None,
        primary: None,
        accent: None,
        preset: None,
        reset: false,
        config: Some(config.to_path_buf()),
        mode: docsite_enhance::Mode::Enhance,
        compiler: "clang_trunk".to_string(),
        options: "-std=c++23 -O2".to_string(),
        service_url: Url::parse("https://godbolt.org/").unwrap(),
        no_compile_links: false,
    }
}

fn read_to_string(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

fn compile_link_count(html: &str) -> usize {
    html.matches("href=\"https://godbolt.org/clientstate/").count()
}

#[test]
fn enhances_a_site_in_place_and_stays_stable() {
    let tmp = tempdir().unwrap();
    let site = tmp.path().join("site");
    let config = tmp.path().join("palette_v1.json");
    write_site(&site);

    let mut first = args(&site, &config);
    first.preset = Some(docsite_enhance::Preset::Md3);
    docsite_enhance::run(first).unwrap();

    let index = read_to_string(&site.join("index.html"));
    let guide = read_to_string(&site.join("guide/setup.html"));

    for page in [&index, &guide] {
        assert!(page.contains("id=\"docsite-palette-style\""));
        assert!(page.contains("--md-primary-fg-color: #6750A4 !important;"));
        assert!(page.contains("--md-accent-fg-color: #EFB8C8 !important;"));
        // One link per page: the python block on the guide page got nothing.
        assert_eq!(compile_link_count(page), 1);
    }
    // The incomplete snippet is labeled, the complete one is not.
    assert!(guide.contains("online-compile-button--no-main"));
    assert!(!index.contains("online-compile-button--no-main"));
    assert!(config.exists());

    // Re-running over the enhanced output changes nothing.
    let mut second = args(&site, &config);
    second.preset = Some(docsite_enhance::Preset::Md3);
    docsite_enhance::run(second).unwrap();
    assert_eq!(read_to_string(&site.join("index.html")), index);
    assert_eq!(read_to_string(&site.join("guide/setup.html")), guide);
}

#[test]
fn persisted_palette_applies_without_flags() {
    let tmp = tempdir().unwrap();
    let config = tmp.path().join("palette_v1.json");

    let first_site = tmp.path().join("site-a");
    write_site(&first_site);
    let mut choose = args(&first_site, &config);
    choose.primary = Some("#009688".to_string());
    choose.accent = Some("#9C27B0".to_string());
    docsite_enhance::run(choose).unwrap();

    // A later run over a fresh copy restores the stored palette.
    let second_site = tmp.path().join("site-b");
    write_site(&second_site);
    docsite_enhance::run(args(&second_site, &config)).unwrap();

    let index = read_to_string(&second_site.join("index.html"));
    assert!(index.contains("--md-primary-fg-color: #009688 !important;"));
    assert!(index.contains("--md-accent-fg-color: #9C27B0 !important;"));
}

#[test]
fn reset_deletes_config_and_strips_the_override() {
    let tmp = tempdir().unwrap();
    let site = tmp.path().join("site");
    let config = tmp.path().join("palette_v1.json");
    write_site(&site);

    let mut choose = args(&site, &config);
    choose.preset = Some(docsite_enhance::Preset::BlueAmber);
    docsite_enhance::run(choose).unwrap();
    assert!(config.exists());

    let mut reset = args(&site, &config);
    reset.reset = true;
    docsite_enhance::run(reset).unwrap();

    assert!(!config.exists());
    let index = read_to_string(&site.join("index.html"));
    assert!(!index.contains("docsite-palette-style"));
    // Compile links survive a palette reset.
    assert_eq!(compile_link_count(&index), 1);
}

#[test]
fn out_dir_mirrors_the_input_tree() {
    let tmp = tempdir().unwrap();
    let site = tmp.path().join("site");
    let out = tmp.path().join("out");
    let config = tmp.path().join("palette_v1.json");
    write_site(&site);

    let mut run = args(&site, &config);
    run.out = Some(out.clone());
    run.primary = Some("#1E88E5".to_string());
    docsite_enhance::run(run).unwrap();

    let mirrored = read_to_string(&out.join("guide/setup.html"));
    assert!(mirrored.contains("--md-primary-fg-color: #1E88E5 !important;"));

    // The input tree is untouched.
    assert!(!read_to_string(&site.join("guide/setup.html")).contains("docsite-palette-style"));
}

#[test]
fn no_compile_links_skips_injection() {
    let tmp = tempdir().unwrap();
    let site = tmp.path().join("site");
    let config = tmp.path().join("palette_v1.json");
    write_site(&site);

    let mut run = args(&site, &config);
    run.primary = Some("#6750A4".to_string());
    run.no_compile_links = true;
    docsite_enhance::run(run).unwrap();

    let index = read_to_string(&site.join("index.html"));
    assert!(index.contains("docsite-palette-style"));
    assert_eq!(compile_link_count(&index), 0);
}
