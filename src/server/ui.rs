//! The embedded single-page chat UI.
//!
//! Served from memory so the binary is self-contained; talks to the JSON
//! API with plain fetch calls.

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Emo-verse</title>
<style>
  :root{--bg:#0b1320;--card:#0f1724;--muted:#94a3b8;--accent:#7c3aed;}
  *{box-sizing:border-box;}
  body{margin:0;background:var(--bg);color:#e6eef8;font-family:system-ui,sans-serif;}
  .wrap{display:flex;gap:16px;max-width:1100px;margin:0 auto;padding:16px;height:100vh;}
  .chat{flex:3;display:flex;flex-direction:column;background:var(--card);border-radius:14px;padding:16px;overflow:hidden;}
  .panel{flex:1;background:var(--card);border-radius:14px;padding:16px;}
  h1{font-size:1.3rem;margin:0 0 4px;}
  .subtitle{color:var(--muted);font-size:0.85rem;margin-bottom:12px;}
  #messages{flex:1;overflow-y:auto;display:flex;flex-direction:column;gap:8px;padding-right:4px;}
  .bubble{border-radius:14px;padding:10px 12px;max-width:78%;}
  .user{align-self:flex-end;background:var(--accent);}
  .bot{align-self:flex-start;background:#1e293b;}
  .meta{color:var(--muted);font-size:0.75rem;margin-top:6px;}
  .probs{font-size:0.75rem;color:var(--muted);margin-top:4px;white-space:pre-line;}
  .error{color:#f87171;}
  textarea{width:100%;height:110px;background:#0b1320;color:#e6eef8;border:1px solid #1e293b;border-radius:10px;padding:8px;resize:vertical;}
  button{background:var(--accent);color:white;border:none;border-radius:10px;padding:8px 14px;margin:6px 6px 0 0;cursor:pointer;}
  button.secondary{background:#334155;}
  input[type=file]{margin-top:8px;color:var(--muted);max-width:100%;}
  hr{border:none;border-top:1px solid #1e293b;margin:14px 0;}
</style>
</head>
<body>
<div class="wrap">
  <div class="chat">
    <h1>Emo-verse</h1>
    <div class="subtitle">Chat with me to know your emotions! &#129504;&#10084;&#65039;</div>
    <div id="messages"></div>
  </div>
  <div class="panel">
    <h3>Input</h3>
    <textarea id="text" placeholder="Type a message..."></textarea>
    <button id="send">Send</button>
    <button id="clear" class="secondary">Clear Chat</button>
    <hr>
    <h3>Upload audio</h3>
    <input type="file" id="audio" accept=".wav,audio/wav">
    <button id="sendAudio">Send Audio</button>
    <div id="status" class="subtitle"></div>
  </div>
</div>
<script>
const messagesEl = document.getElementById('messages');
const statusEl = document.getElementById('status');

function formatProbs(result) {
  return Object.entries(result.all_emotions)
    .map(([k, v]) => k + ': ' + v.toFixed(2))
    .join('\n');
}

function render(history) {
  messagesEl.innerHTML = '';
  for (const msg of history) {
    const div = document.createElement('div');
    div.className = 'bubble ' + (msg.sender === 'user' ? 'user' : 'bot');
    const prefix = msg.kind === 'audio' ? (msg.sender === 'user' ? '\u{1F3A4} ' : '\u{1F50A} Processed ') : '';
    const text = document.createElement('div');
    text.textContent = prefix + msg.content;
    div.appendChild(text);
    if (msg.result) {
      const meta = document.createElement('div');
      meta.className = 'meta' + (msg.result.error ? ' error' : '');
      meta.textContent = msg.result.error
        ? 'Error: ' + msg.result.error
        : 'Emotion: ' + msg.result.dominant_emotion + ' | Conf: ' + msg.result.confidence.toFixed(2);
      div.appendChild(meta);
      if (!msg.result.error) {
        const probs = document.createElement('div');
        probs.className = 'probs';
        probs.textContent = formatProbs(msg.result);
        div.appendChild(probs);
      }
    }
    messagesEl.appendChild(div);
  }
  messagesEl.scrollTop = messagesEl.scrollHeight;
}

async function refresh() {
  const res = await fetch('/api/history');
  render(await res.json());
}

document.getElementById('send').onclick = async () => {
  const textarea = document.getElementById('text');
  const text = textarea.value.trim();
  if (!text) return;
  statusEl.textContent = 'Analyzing...';
  await fetch('/api/message/text', {
    method: 'POST',
    headers: {'Content-Type': 'application/json'},
    body: JSON.stringify({text})
  });
  textarea.value = '';
  statusEl.textContent = '';
  refresh();
};

document.getElementById('sendAudio').onclick = async () => {
  const input = document.getElementById('audio');
  if (!input.files.length) return;
  const form = new FormData();
  form.append('file', input.files[0]);
  statusEl.textContent = 'Processing audio...';
  await fetch('/api/message/audio', {method: 'POST', body: form});
  input.value = '';
  statusEl.textContent = '';
  refresh();
};

document.getElementById('clear').onclick = async () => {
  await fetch('/api/history/clear', {method: 'POST'});
  refresh();
};

refresh();
</script>
</body>
</html>
"#;
