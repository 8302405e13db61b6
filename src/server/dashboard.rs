//! Static dashboard page served at `GET /`.

/// Single-page dashboard driving `/api/setup` and `/api/search`.
pub const DASHBOARD_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>fanout-rs</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 960px; margin: 2rem auto; padding: 0 1rem; color: #222; }
  h1 { margin-bottom: .25rem; }
  .muted { color: #666; }
  section { border: 1px solid #ddd; border-radius: 8px; padding: 1rem; margin: 1rem 0; }
  input[type=password], textarea { width: 100%; box-sizing: border-box; padding: .5rem; margin: .25rem 0 .75rem; }
  textarea { min-height: 5rem; }
  button { padding: .5rem 1rem; cursor: pointer; }
  .status { padding: .5rem .75rem; border-radius: 6px; margin: .5rem 0; }
  .status.success { background: #e6f4ea; }
  .status.error { background: #fce8e6; }
  .status.warning { background: #fef7e0; }
  .counts span { margin-right: 1.5rem; }
  .answer { border-left: 4px solid #888; padding: .5rem 1rem; margin: 1rem 0; white-space: pre-wrap; }
  .answer.answered { border-color: #1a73e8; }
  .answer.unavailable { border-color: #d93025; }
  .answer.not_configured { border-color: #bbb; color: #777; }
  .hidden { display: none; }
</style>
</head>
<body>
<h1>fanout-rs</h1>
<p class="muted">Papers from arXiv and articles from Wikipedia, answered by every configured provider.</p>

<section>
  <h2>API keys</h2>
  <label>Groq <input type="password" id="groq-key" placeholder="gsk_..."></label>
  <label>Google <input type="password" id="google-key" placeholder="AIza..."></label>
  <button id="setup-btn">Save keys</button>
  <div id="status" class="status hidden"></div>
</section>

<section>
  <h2>Search</h2>
  <textarea id="query" placeholder="e.g. What is machine learning?" disabled></textarea>
  <label><input type="checkbox" id="papers" checked disabled> arXiv papers</label>
  <label><input type="checkbox" id="articles" checked disabled> Wikipedia articles</label>
  <p><button id="search-btn" disabled>Search</button> <span id="loading" class="muted hidden">Searching...</span></p>
</section>

<section id="results" class="hidden">
  <h2>Results</h2>
  <p class="counts"><span>Papers: <b id="paper-count">0</b></span><span>Articles: <b id="article-count">0</b></span></p>
  <div id="answers"></div>
</section>

<script>
  const $ = (id) => document.getElementById(id);
  const LABELS = { groq: "Groq", google: "Google" };

  function showStatus(message, kind) {
    const el = $("status");
    el.className = "status " + kind;
    el.textContent = message;
  }

  function enableSearch(ready) {
    ["query", "papers", "articles", "search-btn"].forEach((id) => { $(id).disabled = !ready; });
  }

  function escapeHtml(text) {
    const map = { "&": "&amp;", "<": "&lt;", ">": "&gt;", '"': "&quot;", "'": "&#039;" };
    return text.replace(/[&<>"']/g, (m) => map[m]);
  }

  async function post(path, body) {
    const response = await fetch(path, {
      method: "POST",
      headers: { "Content-Type": "application/json" },
      body: JSON.stringify(body),
    });
    return response.json();
  }

  async function setup() {
    const groq = $("groq-key").value.trim();
    const google = $("google-key").value.trim();
    if (!groq && !google) {
      showStatus("Please provide at least one API key", "error");
      return;
    }
    try {
      const data = await post("/api/setup", { groq_key: groq || null, google_key: google || null });
      if (data.success) {
        showStatus("Ready. Active providers: " + data.providers.join(", "), "success");
        enableSearch(true);
      } else {
        showStatus("Setup failed: " + data.error, "error");
      }
    } catch (e) {
      showStatus("Error: " + e.message, "error");
    }
  }

  function render(data) {
    $("paper-count").textContent = data.paper_count;
    $("article-count").textContent = data.article_count;
    let html = "";
    if (data.paper_count === 0 && data.article_count === 0) {
      html += '<div class="status warning">Search found nothing; answers were generated without context.</div>';
    }
    for (const id of Object.keys(LABELS)) {
      const status = data.provider_status[id];
      let body;
      if (status === "answered") {
        body = escapeHtml(data.responses[id]);
      } else if (status === "unavailable") {
        body = "No answer from " + LABELS[id] + ": every model failed or timed out.";
      } else {
        body = LABELS[id] + " is not configured.";
      }
      html += '<div class="answer ' + status + '"><b>' + LABELS[id] + "</b>\n" + body + "</div>";
    }
    $("answers").innerHTML = html;
    $("results").classList.remove("hidden");
  }

  async function search() {
    const query = $("query").value.trim();
    if (!query) {
      showStatus("Please enter a search query", "warning");
      return;
    }
    $("loading").classList.remove("hidden");
    try {
      const data = await post("/api/search", {
        query,
        include_paper_source: $("papers").checked,
        include_article_source: $("articles").checked,
      });
      if (data.success) {
        render(data);
      } else {
        showStatus("Search failed: " + data.error, "error");
      }
    } catch (e) {
      showStatus("Error: " + e.message, "error");
    } finally {
      $("loading").classList.add("hidden");
    }
  }

  $("setup-btn").addEventListener("click", setup);
  $("search-btn").addEventListener("click", search);

  fetch("/api/health").then((r) => r.json()).then((data) => {
    if (data.ready) {
      showStatus("Ready. Active providers: " + data.providers.join(", "), "success");
      enableSearch(true);
    }
  });
</script>
</body>
</html>
"#;
