/// Escapes text for HTML element content and double-quoted attributes.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Mooniform</title>
  <style>
    :root {
      --tint-rgb: 120, 255, 170;
      --ink: #e9f1ec;
      --bg: #07090b;
      --muted: #8c9a92;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, rgba(var(--tint-rgb), 0.18), transparent 60%), var(--bg);
      color: var(--ink);
      font-family: "Space Mono", "Courier New", monospace;
      display: grid;
      place-items: start center;
      padding: 40px 18px 140px;
    }

    body.lefty .dock {
      left: 18px;
      right: auto;
    }

    main {
      width: min(760px, 100%);
      display: grid;
      gap: 36px;
    }

    h1 {
      margin: 0;
      letter-spacing: 0.3em;
      text-transform: lowercase;
      color: rgb(var(--tint-rgb));
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1rem;
      letter-spacing: 0.2em;
      color: var(--muted);
    }

    a,
    button {
      color: rgb(var(--tint-rgb));
    }

    button {
      background: transparent;
      border: 1px solid rgba(var(--tint-rgb), 0.5);
      border-radius: 999px;
      padding: 6px 14px;
      font: inherit;
      cursor: pointer;
    }

    .tints {
      display: flex;
      gap: 10px;
      align-items: center;
    }

    .tints button {
      width: 18px;
      height: 18px;
      padding: 0;
      background: rgb(var(--dot));
    }

    #showsList {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 10px;
    }

    .show-meta {
      color: var(--muted);
      font-size: 0.9rem;
    }

    form {
      display: grid;
      gap: 10px;
    }

    input,
    textarea {
      background: rgba(255, 255, 255, 0.04);
      border: 1px solid rgba(var(--tint-rgb), 0.3);
      color: var(--ink);
      font: inherit;
      padding: 8px 10px;
    }

    .booking-success,
    .booking-error,
    .status {
      font-size: 0.9rem;
      color: rgb(var(--tint-rgb));
    }

    .dock {
      position: fixed;
      right: 18px;
      bottom: 18px;
      width: min(340px, calc(100% - 36px));
      padding: 14px;
      border: 1px solid rgba(var(--tint-rgb), 0.4);
      background: rgba(7, 9, 11, 0.92);
      display: grid;
      gap: 10px;
    }

    .dock[hidden] {
      display: none;
    }

    .dock .controls {
      display: flex;
      gap: 8px;
    }

    .scrub {
      height: 8px;
      background: rgba(var(--tint-rgb), 0.15);
      cursor: pointer;
      touch-action: none;
    }

    .scrub .fill {
      height: 100%;
      width: 0;
      background: rgb(var(--tint-rgb));
    }

    .starburst {
      position: fixed;
      pointer-events: none;
      color: rgb(var(--tint-rgb));
      animation: burst 480ms ease-out forwards;
    }

    @keyframes burst {
      to {
        transform: translate(var(--dx), var(--dy));
        opacity: 0;
      }
    }
  </style>
</head>
<body>
  <main>
    <header>
      <h1>mooniform</h1>
      <div class="tints">
        <button type="button" data-tint="120,255,170" style="--dot: 120,255,170" aria-label="green"></button>
        <button type="button" data-tint="255,96,96" style="--dot: 255,96,96" aria-label="red"></button>
        <button type="button" data-tint="110,170,255" style="--dot: 110,170,255" aria-label="blue"></button>
        <label><input type="checkbox" id="lefty" /> lefty</label>
      </div>
    </header>

    <section>
      <h2>upcoming shows</h2>
      <ul id="showsList"><li class="show-meta">loading…</li></ul>
    </section>

    <section>
      <h2>booking</h2>
      <form id="bookingForm" action="/api/booking" method="post">
        <input name="name" placeholder="name" required />
        <input name="email" type="email" placeholder="email" required />
        <input name="date" type="date" id="bookingDate" />
        <span class="status" id="availability"></span>
        <textarea name="message" rows="4" placeholder="tell us about the show"></textarea>
        <div class="booking-submit"><button type="submit">send</button></div>
      </form>
    </section>
  </main>

  <aside class="dock" id="dock" hidden>
    <div id="trackTitle"></div>
    <div class="scrub" id="scrub"><div class="fill" id="scrubFill"></div></div>
    <div class="controls">
      <button type="button" data-action="prev">prev</button>
      <button type="button" data-action="toggle" id="playBtn">play</button>
      <button type="button" data-action="next">next</button>
      <button type="button" data-action="mute" id="muteBtn">mute</button>
      <button type="button" data-action="hide">×</button>
    </div>
    <audio id="audio" preload="metadata"></audio>
  </aside>

  <script>
    const root = document.documentElement;
    const post = (url, body) =>
      fetch(url, {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify(body)
      });

    const glyphs = ['✦', '✧', '✹', '✷', '✸', '✺', '⋆', '✴︎'];
    document.addEventListener('click', (e) => {
      const target = e.target.closest('a, button');
      if (!target || target.disabled) return;
      for (let i = 0; i < 10; i++) {
        const s = document.createElement('div');
        const angle = Math.random() * Math.PI * 2;
        const dist = 18 + Math.random() * 26;
        s.className = 'starburst';
        s.textContent = glyphs[Math.floor(Math.random() * glyphs.length)];
        s.style.left = `${e.clientX}px`;
        s.style.top = `${e.clientY}px`;
        s.style.setProperty('--dx', `${Math.cos(angle) * dist}px`);
        s.style.setProperty('--dy', `${Math.sin(angle) * dist}px`);
        document.body.appendChild(s);
        setTimeout(() => s.remove(), 480);
      }
    });

    const lefty = document.getElementById('lefty');
    const applyPrefs = (prefs) => {
      if (prefs.tint) root.style.setProperty('--tint-rgb', prefs.tint);
      document.body.classList.toggle('lefty', prefs.lefty);
      lefty.checked = prefs.lefty;
    };
    const savePrefs = (update) =>
      post('/api/prefs', update).then((res) => (res.ok ? res.json() : null)).then((p) => p && applyPrefs(p));

    document.querySelectorAll('[data-tint]').forEach((btn) => {
      btn.addEventListener('click', () => savePrefs({ tint: btn.dataset.tint }));
    });
    lefty.addEventListener('change', () => savePrefs({ lefty: lefty.checked }));
    fetch('/api/prefs').then((res) => res.json()).then(applyPrefs).catch(() => {});

    const showsEl = document.getElementById('showsList');
    let showsSeq = 0;
    const loadShows = async () => {
      const seq = ++showsSeq;
      showsEl.innerHTML = '<li class="show-meta">loading…</li>';
      let html = '<li><div class="show-meta">shows feed unavailable.</div></li>';
      try {
        const res = await fetch('/api/shows', { cache: 'no-store' });
        if (res.ok) html = await res.text();
      } catch (_) {}
      if (seq === showsSeq) showsEl.innerHTML = html;
    };
    loadShows();

    const form = document.getElementById('bookingForm');
    const submitWrap = form.querySelector('.booking-submit');
    const submitBtn = form.querySelector('button[type="submit"]');
    form.addEventListener('submit', async (e) => {
      e.preventDefault();
      submitBtn.disabled = true;
      submitBtn.textContent = 'sending…';
      form.querySelector('.booking-error')?.remove();
      let outcome = { ok: false, message: 'Hmm—something went wrong. Try again?' };
      try {
        const res = await fetch('/api/booking', {
          method: 'POST',
          body: new URLSearchParams(new FormData(form))
        });
        if (res.ok) outcome = await res.json();
      } catch (_) {}
      if (outcome.ok) {
        const box = document.createElement('div');
        box.className = 'booking-success';
        box.textContent = outcome.message;
        submitWrap.replaceWith(box);
        form.reset();
      } else {
        submitBtn.disabled = false;
        submitBtn.textContent = 'send';
        const msg = document.createElement('span');
        msg.className = 'booking-error';
        msg.textContent = outcome.message;
        submitWrap.appendChild(msg);
      }
    });

    const availabilityEl = document.getElementById('availability');
    document.getElementById('bookingDate').addEventListener('change', async (e) => {
      if (!e.target.value) return;
      availabilityEl.textContent = 'checking…';
      try {
        const res = await fetch(`/api/availability?date=${encodeURIComponent(e.target.value)}`);
        availabilityEl.textContent = res.ok ? (await res.json()).message : '';
      } catch (_) {
        availabilityEl.textContent = "couldn't check availability right now.";
      }
    });

    const dock = document.getElementById('dock');
    const audio = document.getElementById('audio');
    const scrub = document.getElementById('scrub');
    const scrubFill = document.getElementById('scrubFill');

    const applyCommand = (cmd) => {
      switch (cmd.op) {
        case 'set_source':
          audio.src = cmd.path;
          audio.load();
          break;
        case 'play':
          audio.play().catch(() => player('/api/player/media', { event: 'play_rejected' }));
          break;
        case 'pause':
          audio.pause();
          break;
        case 'seek':
          audio.currentTime = cmd.seconds;
          break;
        case 'set_muted':
          audio.muted = cmd.muted;
          break;
      }
    };

    const render = ({ player: view, commands }) => {
      commands.forEach(applyCommand);
      dock.hidden = view.hidden;
      document.getElementById('trackTitle').textContent = view.title;
      document.getElementById('playBtn').textContent = view.playing ? 'pause' : 'play';
      document.getElementById('muteBtn').textContent = view.muted ? 'unmute' : 'mute';
      scrubFill.style.width = `${view.progress_percent}%`;
    };

    const player = (url, body) =>
      (body ? post(url, body) : fetch(url))
        .then((res) => (res.ok ? res.json() : null))
        .then((data) => data && render(data))
        .catch(() => {});

    dock.querySelectorAll('[data-action]').forEach((btn) => {
      btn.addEventListener('click', () => player('/api/player/action', { action: btn.dataset.action }));
    });

    audio.addEventListener('loadedmetadata', () =>
      player('/api/player/media', { event: 'loadedmetadata', duration: audio.duration }));
    audio.addEventListener('timeupdate', () =>
      player('/api/player/media', { event: 'timeupdate', current_time: audio.currentTime }));
    audio.addEventListener('ended', () => player('/api/player/media', { event: 'ended' }));

    const scrubEvent = (phase, e) => {
      const rect = scrub.getBoundingClientRect();
      player('/api/player/scrub', { phase, x: e.clientX, left: rect.left, width: rect.width });
    };
    scrub.addEventListener('pointerdown', (e) => scrubEvent('down', e));
    scrub.addEventListener('pointermove', (e) => e.buttons && scrubEvent('move', e));
    scrub.addEventListener('pointerup', (e) => scrubEvent('up', e));
    scrub.addEventListener('pointerleave', (e) => scrubEvent('leave', e));
    scrub.addEventListener('click', (e) => scrubEvent('click', e));

    player('/api/player');
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom's & Co</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom&#39;s &amp; Co&lt;/a&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }
}
